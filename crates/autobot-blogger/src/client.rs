//! Blogger API v3 client.

use std::time::{Duration, Instant};

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use autobot_core::defaults::BLOGGER_POSTS_LIMIT;
use autobot_core::{AppConfig, Error, Result};

use crate::http::status_error;
use crate::types::{
    BloggerBlog, BloggerList, BloggerPost, CreatePostRequest, PostBody, UpdatePostRequest,
};

/// Credential attached to a Blogger request.
///
/// Reads of public blogs work with an API key; anything touching the user's
/// own blogs or writing posts needs an OAuth bearer token.
#[derive(Clone)]
pub enum BloggerAuth {
    ApiKey(String),
    Bearer(String),
}

impl std::fmt::Debug for BloggerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
            Self::Bearer(_) => f.write_str("Bearer([REDACTED])"),
        }
    }
}

impl BloggerAuth {
    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey(key) => builder.query(&[("key", key.as_str())]),
            Self::Bearer(token) => builder.bearer_auth(token),
        }
    }
}

/// HTTP client for the Blogger REST API.
pub struct BloggerClient {
    client: reqwest::Client,
    base_url: String,
}

impl BloggerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.blogger_api_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, auth: &BloggerAuth) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        auth.apply(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, context: &str) -> Result<T> {
        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("{}: {}", context, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, context));
        }

        let parsed = response
            .json::<T>()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("{}: invalid response: {}", context, e)))?;

        debug!(
            subsystem = "blogger",
            component = "client",
            context,
            duration_ms = start.elapsed().as_millis() as u64,
            "Blogger request complete"
        );
        Ok(parsed)
    }

    /// Blogs owned by the token's user.
    #[instrument(skip(self, access_token), fields(subsystem = "blogger", component = "client", op = "list_my_blogs"))]
    pub async fn list_my_blogs(&self, access_token: &str) -> Result<Vec<BloggerBlog>> {
        let auth = BloggerAuth::Bearer(access_token.to_string());
        let builder = self.request(Method::GET, "/users/self/blogs", &auth);
        let list: BloggerList<BloggerBlog> = self.send(builder, "list blogs").await?;
        debug!(result_count = list.items.len(), "Listed blogs");
        Ok(list.items)
    }

    #[instrument(skip(self, auth), fields(subsystem = "blogger", component = "client", op = "get_blog"))]
    pub async fn get_blog(&self, auth: &BloggerAuth, blog_id: &str) -> Result<BloggerBlog> {
        let path = format!("/blogs/{}", urlencoding::encode(blog_id));
        let builder = self.request(Method::GET, &path, auth);
        self.send(builder, "get blog").await
    }

    /// Most recent posts, `max_results` defaulting to 10.
    #[instrument(skip(self, auth), fields(subsystem = "blogger", component = "client", op = "list_posts"))]
    pub async fn list_posts(
        &self,
        auth: &BloggerAuth,
        blog_id: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<BloggerPost>> {
        let path = format!("/blogs/{}/posts", urlencoding::encode(blog_id));
        let max_results = max_results.unwrap_or(BLOGGER_POSTS_LIMIT).to_string();
        let builder = self
            .request(Method::GET, &path, auth)
            .query(&[("maxResults", max_results.as_str())]);
        let list: BloggerList<BloggerPost> = self.send(builder, "list posts").await?;
        Ok(list.items)
    }

    #[instrument(skip(self, auth), fields(subsystem = "blogger", component = "client", op = "get_post"))]
    pub async fn get_post(
        &self,
        auth: &BloggerAuth,
        blog_id: &str,
        post_id: &str,
    ) -> Result<BloggerPost> {
        let path = format!(
            "/blogs/{}/posts/{}",
            urlencoding::encode(blog_id),
            urlencoding::encode(post_id)
        );
        let builder = self.request(Method::GET, &path, auth);
        self.send(builder, "get post").await
    }

    /// Create a post; unpublished posts are saved as drafts.
    #[instrument(skip(self, access_token, req), fields(subsystem = "blogger", component = "client", op = "create_post", blog_id = %req.blog_id))]
    pub async fn create_post(
        &self,
        access_token: &str,
        req: &CreatePostRequest,
    ) -> Result<BloggerPost> {
        let auth = BloggerAuth::Bearer(access_token.to_string());
        let path = format!("/blogs/{}/posts", urlencoding::encode(&req.blog_id));
        let body = PostBody::new(&req.blog_id, &req.title, &req.content, &req.labels);

        let mut builder = self.request(Method::POST, &path, &auth).json(&body);
        if !req.publish {
            builder = builder.query(&[("isDraft", "true")]);
        }

        let post: BloggerPost = self.send(builder, "create post").await?;
        info!(post_id = %post.id, publish = req.publish, "Created Blogger post");
        Ok(post)
    }

    #[instrument(skip(self, access_token, req), fields(subsystem = "blogger", component = "client", op = "update_post", blog_id = %req.blog_id))]
    pub async fn update_post(
        &self,
        access_token: &str,
        req: &UpdatePostRequest,
    ) -> Result<BloggerPost> {
        let auth = BloggerAuth::Bearer(access_token.to_string());
        let path = format!(
            "/blogs/{}/posts/{}",
            urlencoding::encode(&req.blog_id),
            urlencoding::encode(&req.post_id)
        );
        let body = PostBody::new(&req.blog_id, &req.title, &req.content, &req.labels);
        let publish = if req.publish { "true" } else { "false" };

        let builder = self
            .request(Method::PUT, &path, &auth)
            .query(&[("publish", publish)])
            .json(&body);

        let post: BloggerPost = self.send(builder, "update post").await?;
        info!(post_id = %post.id, "Updated Blogger post");
        Ok(post)
    }

    #[instrument(skip(self, access_token), fields(subsystem = "blogger", component = "client", op = "delete_post"))]
    pub async fn delete_post(&self, access_token: &str, blog_id: &str, post_id: &str) -> Result<()> {
        let auth = BloggerAuth::Bearer(access_token.to_string());
        let path = format!(
            "/blogs/{}/posts/{}",
            urlencoding::encode(blog_id),
            urlencoding::encode(post_id)
        );
        let response = self
            .request(Method::DELETE, &path, &auth)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("delete post: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, "delete post"));
        }
        info!(post_id, "Deleted Blogger post");
        Ok(())
    }

    /// Raw status of an API-key-authenticated probe, used for key checks.
    pub(crate) async fn probe(&self, path: &str, api_key: &str) -> reqwest::Result<(u16, String)> {
        let auth = BloggerAuth::ApiKey(api_key.to_string());
        let response = self.request(Method::GET, path, &auth).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }
}
