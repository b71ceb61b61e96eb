//! # autobot-blogger
//!
//! Google integration for autobot: the OAuth authorization-code flow, a
//! per-user token manager that refreshes expired tokens, a Blogger API v3
//! client, third-party API key validation, and daily publish scheduling.

mod http;

pub mod api_keys;
pub mod client;
pub mod oauth;
pub mod schedule;
pub mod tokens;
pub mod types;

pub use api_keys::{validate_api_key, verify_google_api_key, ApiKeyService, ApiKeyValidation};
pub use client::{BloggerAuth, BloggerClient};
pub use oauth::{verify_state, AuthorizationRequest, GoogleOAuthClient, OAuthClientConfig};
pub use schedule::{
    next_publish_time, parse_publish_time, resolve_timezone, PublishScheduler, PublishZone,
};
pub use tokens::TokenManager;
pub use types::{
    BlogPostsSummary, BlogRef, BloggerBlog, BloggerList, BloggerPost, BloggerPostStatus,
    CreatePostRequest, PostAuthor, ReaderComments, UpdatePostRequest,
};
