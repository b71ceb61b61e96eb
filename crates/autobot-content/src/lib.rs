//! # autobot-content
//!
//! Content optimization for autobot posts.
//!
//! This crate provides:
//! - Regex-level HTML inspection (H2s, images, paragraphs, keyword density)
//! - On-page SEO optimization with a 0–100 score and recommendations
//! - Keyword-driven reconstruction of existing drafts

pub mod html;
pub mod reconstruction;
pub mod seo;

pub use html::{count_occurrences, keyword_density};
pub use reconstruction::{reconstruct_blog_post, ReconstructedPost, ReconstructionRequest};
pub use seo::{optimize_seo, seo_score, SeoReport, SeoRequest};
