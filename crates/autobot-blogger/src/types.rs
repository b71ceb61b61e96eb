//! Blogger API v3 resource types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostsSummary {
    pub total_items: u64,
    #[serde(default)]
    pub self_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloggerBlog {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub posts: Option<BlogPostsSummary>,
    #[serde(default)]
    pub pages: Option<BlogPostsSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BloggerPostStatus {
    Live,
    Draft,
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderComments {
    pub total_items: u64,
    #[serde(default)]
    pub self_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloggerPost {
    pub id: String,
    pub blog: BlogRef,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub self_link: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<PostAuthor>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub status: Option<BloggerPostStatus>,
    #[serde(default)]
    pub custom_meta_data: Option<String>,
    #[serde(default)]
    pub replies: Option<ReaderComments>,
}

/// Generic Blogger list envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloggerList<T> {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub blog_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Publish immediately; otherwise the post is saved as a draft.
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub blog_id: String,
    pub post_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub publish: bool,
}

/// Body sent to the posts endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct PostBody<'a> {
    pub kind: &'static str,
    pub blog: BlogRef,
    pub title: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub labels: &'a [String],
}

impl<'a> PostBody<'a> {
    pub fn new(blog_id: &str, title: &'a str, content: &'a str, labels: &'a [String]) -> Self {
        Self {
            kind: "blogger#post",
            blog: BlogRef {
                id: blog_id.to_string(),
            },
            title,
            content,
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_deserializes_camel_case() {
        let json = r#"{
            "kind": "blogger#post",
            "id": "p1",
            "blog": {"id": "b1"},
            "title": "Hello",
            "content": "<p>hi</p>",
            "selfLink": "https://example.com/p1",
            "author": {"id": "a1", "displayName": "Kim"},
            "status": "LIVE",
            "replies": {"totalItems": 3}
        }"#;
        let post: BloggerPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.blog.id, "b1");
        assert_eq!(post.author.unwrap().display_name, "Kim");
        assert_eq!(post.status, Some(BloggerPostStatus::Live));
        assert_eq!(post.replies.unwrap().total_items, 3);
        assert!(post.labels.is_empty());
    }

    #[test]
    fn test_empty_list_has_no_items() {
        let list: BloggerList<BloggerBlog> =
            serde_json::from_str(r#"{"kind": "blogger#blogList"}"#).unwrap();
        assert!(list.items.is_empty());
        assert!(list.next_page_token.is_none());
    }

    #[test]
    fn test_post_body_omits_empty_labels() {
        let body = PostBody::new("b1", "T", "C", &[]);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["kind"], "blogger#post");
        assert_eq!(value["blog"]["id"], "b1");
        assert!(value.get("labels").is_none());
    }
}
