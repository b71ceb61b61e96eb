//! On-page SEO optimization for a draft post.
//!
//! Given a title, an HTML body, and ranked keywords, produce an optimized
//! title, a meta description, H2 headings, image alt texts, internal link
//! suggestions, a 0–100 score, and human-readable recommendations.
//!
//! The score has five 20-point components:
//!
//! | component        | 20        | 15         | 10    |
//! |------------------|-----------|------------|-------|
//! | title length     | 30–60     | 20–70      | other |
//! | H2 count         | ≥ 3       | 2          | 1     |
//! | keyword density  | 1–3 %     | 0.5–5 %    | other |
//! | meta length      | 120–160   | 100–180    | other |
//! | image alt texts  | all set   | –          | some missing |
//!
//! No H2s and no images contribute nothing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use autobot_core::defaults::{
    CONTENT_MIN_CHARS, META_MAX_CHARS, META_MIN_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
use autobot_core::strip_html;
use autobot_core::text::{char_len, take_chars, truncate_with_ellipsis};

use crate::html::{alt_text, h2_elements, img_tags, keyword_density};

/// Visible characters taken from the body for a meta description.
const META_SOURCE_CHARS: usize = 150;

/// Maximum H2 headings carried over from the body.
const MAX_EXISTING_H2: usize = 5;

/// H2 count below which keyword headings are added.
const MIN_H2: usize = 3;

/// Keywords turned into internal link suggestions.
const MAX_INTERNAL_LINKS: usize = 3;

const DEFAULT_ALT_SUBJECT: &str = "이미지";

/// Draft to optimize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoRequest {
    pub title: String,
    /// HTML body.
    pub content: String,
    /// Keywords, most important first.
    pub keywords: Vec<String>,
    /// Base URL for internal link suggestions (default `/blog`).
    pub target_url: Option<String>,
}

/// Optimization output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    pub title: String,
    pub meta_description: String,
    pub h2_tags: Vec<String>,
    pub keywords: Vec<String>,
    pub image_alt_texts: Vec<String>,
    pub internal_links: Vec<String>,
    /// 0–100
    pub seo_score: u32,
    pub recommendations: Vec<String>,
}

/// Run every optimization step over a draft.
pub fn optimize_seo(request: &SeoRequest) -> SeoReport {
    let keywords = &request.keywords;

    let title = optimize_title(&request.title, keywords);
    let meta_description = meta_description(&request.content, keywords);
    let h2_tags = optimize_h2_tags(&request.content, keywords);
    let image_alt_texts = image_alt_texts(&request.content, keywords);
    let internal_links = internal_links(keywords, request.target_url.as_deref());

    let seo_score = seo_score(
        &title,
        &request.content,
        &h2_tags,
        keywords,
        &meta_description,
        &image_alt_texts,
    );
    let recommendations = recommendations(
        &title,
        &request.content,
        &h2_tags,
        keywords,
        &meta_description,
    );

    debug!(
        subsystem = "content",
        component = "seo",
        op = "optimize",
        seo_score,
        recommendation_count = recommendations.len(),
        "SEO optimization complete"
    );

    SeoReport {
        title,
        meta_description,
        h2_tags,
        keywords: keywords.clone(),
        image_alt_texts,
        internal_links,
        seo_score,
        recommendations,
    }
}

/// Put the main keyword in front of the title and shape it to 30–60 chars.
///
/// Long titles are cut with `...`; short ones get the second keyword when it
/// fits in the remaining room.
pub fn optimize_title(title: &str, keywords: &[String]) -> String {
    let mut optimized = match keywords.first() {
        Some(main) if !title.contains(main.as_str()) => format!("{} {}", main, title),
        _ => title.to_string(),
    };

    let len = char_len(&optimized);
    if len > TITLE_MAX_CHARS {
        return truncate_with_ellipsis(&optimized, TITLE_MAX_CHARS);
    }

    if len < TITLE_MIN_CHARS {
        if let Some(second) = keywords.get(1) {
            if TITLE_MIN_CHARS - len > char_len(second) {
                optimized.push(' ');
                optimized.push_str(second);
            }
        }
    }

    optimized
}

/// Meta description drawn from the start of the body.
///
/// The main keyword is worked in when missing. With `pad_to_min`, short
/// descriptions are topped up from the body text after the first 150
/// characters. Always at most 160 characters.
pub(crate) fn describe(content: &str, keywords: &[String], pad_to_min: bool) -> String {
    let text = strip_html(content);
    let text = text.trim();
    let mut description = take_chars(text, META_SOURCE_CHARS).trim().to_string();

    if let Some(main) = keywords.first().filter(|k| !k.is_empty()) {
        if !description.contains(main.as_str()) {
            description = format!("{}에 대한 정보입니다. {}", main, description);
        }
    }

    let len = char_len(&description);
    if len > META_MAX_CHARS {
        return truncate_with_ellipsis(&description, META_MAX_CHARS);
    }

    if pad_to_min && len < META_MIN_CHARS {
        description.extend(text.chars().skip(META_SOURCE_CHARS).take(META_MIN_CHARS - len));
    }

    description
}

/// Meta description targeting 120–160 characters.
pub fn meta_description(content: &str, keywords: &[String]) -> String {
    describe(content, keywords, true)
}

/// H2 headings for the post.
///
/// The first existing H2 is rewritten as `"{keyword}: {text}"` when it lacks
/// the main keyword; up to four more existing H2s follow. Missing headings
/// are filled from the secondary keywords until there are three.
pub fn optimize_h2_tags(content: &str, keywords: &[String]) -> Vec<String> {
    let existing = h2_elements(content);
    let mut tags = Vec::new();

    match (existing.first(), keywords.first()) {
        (Some(first), Some(main)) if !first.contains(main.as_str()) => {
            tags.push(format!("<h2>{}: {}</h2>", main, strip_html(first)));
        }
        (Some(first), _) => tags.push(first.clone()),
        (None, Some(main)) => tags.push(format!("<h2>{}</h2>", main)),
        (None, None) => {}
    }

    tags.extend(existing.iter().skip(1).take(MAX_EXISTING_H2 - 1).cloned());

    if tags.len() < MIN_H2 && keywords.len() > 1 {
        let end = (MIN_H2 + 1 - tags.len()).min(keywords.len());
        for keyword in &keywords[1..end] {
            tags.push(format!("<h2>{}</h2>", keyword));
        }
    }

    tags
}

/// Alt text for every image: the existing `alt`, or `"{keyword} 관련 이미지"`.
pub fn image_alt_texts(content: &str, keywords: &[String]) -> Vec<String> {
    let subject = keywords
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_ALT_SUBJECT);

    img_tags(content)
        .into_iter()
        .map(|tag| match alt_text(tag) {
            Some(alt) => alt.to_string(),
            None => format!("{} 관련 이미지", subject),
        })
        .collect()
}

/// Link targets for the top three keywords.
pub fn internal_links(keywords: &[String], target_url: Option<&str>) -> Vec<String> {
    let base = target_url.map(|u| u.trim_end_matches('/')).unwrap_or("/blog");
    keywords
        .iter()
        .take(MAX_INTERNAL_LINKS)
        .map(|k| format!("{}/{}", base, urlencoding::encode(k)))
        .collect()
}

pub(crate) fn title_points(title: &str) -> u32 {
    match char_len(title) {
        30..=60 => 20,
        20..=70 => 15,
        _ => 10,
    }
}

pub(crate) fn h2_points(h2_tags: &[String]) -> u32 {
    match h2_tags.len() {
        0 => 0,
        1 => 10,
        2 => 15,
        _ => 20,
    }
}

pub(crate) fn density_points(content: &str, keywords: &[String]) -> u32 {
    match keyword_density(content, keywords) {
        Some(d) if (1.0..=3.0).contains(&d) => 20,
        Some(d) if (0.5..=5.0).contains(&d) => 15,
        _ => 10,
    }
}

pub(crate) fn meta_points(meta: &str) -> u32 {
    match char_len(meta) {
        120..=160 => 20,
        100..=180 => 15,
        _ => 10,
    }
}

/// SEO score, 0–100.
pub fn seo_score(
    title: &str,
    content: &str,
    h2_tags: &[String],
    keywords: &[String],
    meta_description: &str,
    image_alt_texts: &[String],
) -> u32 {
    let alt_points = if image_alt_texts.is_empty() {
        0
    } else if image_alt_texts.iter().all(|a| !a.is_empty()) {
        20
    } else {
        10
    };

    let total = title_points(title)
        + h2_points(h2_tags)
        + density_points(content, keywords)
        + meta_points(meta_description)
        + alt_points;
    total.min(100)
}

/// Improvement suggestions for whatever falls outside the target windows.
pub fn recommendations(
    title: &str,
    content: &str,
    h2_tags: &[String],
    keywords: &[String],
    meta_description: &str,
) -> Vec<String> {
    let mut out = Vec::new();
    let main = keywords.first();

    let title_len = char_len(title);
    if title_len < TITLE_MIN_CHARS {
        out.push(format!("제목을 {}자 이상으로 늘려주세요.", TITLE_MIN_CHARS));
    } else if title_len > TITLE_MAX_CHARS {
        out.push(format!("제목을 {}자 이하로 줄여주세요.", TITLE_MAX_CHARS));
    }

    if let Some(main) = main {
        if !title.contains(main.as_str()) {
            out.push(format!("제목에 주요 키워드 \"{}\"를 포함해주세요.", main));
        }
    }

    if h2_tags.len() < MIN_H2 {
        out.push(format!("H2 태그를 최소 {}개 이상 추가해주세요.", MIN_H2));
    }

    if let (Some(first), Some(main)) = (h2_tags.first(), main) {
        if !first.contains(main.as_str()) {
            out.push("첫 번째 H2 태그에 주요 키워드를 포함해주세요.".to_string());
        }
    }

    if char_len(&strip_html(content)) < CONTENT_MIN_CHARS {
        out.push(format!("콘텐츠를 {}자 이상으로 늘려주세요.", CONTENT_MIN_CHARS));
    }

    let meta_len = char_len(meta_description);
    if meta_len < META_MIN_CHARS {
        out.push(format!("메타 설명을 {}자 이상으로 늘려주세요.", META_MIN_CHARS));
    } else if meta_len > META_MAX_CHARS {
        out.push(format!("메타 설명을 {}자 이하로 줄여주세요.", META_MAX_CHARS));
    }

    match keyword_density(content, keywords) {
        Some(d) if d < 1.0 => out.push("키워드 밀도를 1% 이상으로 늘려주세요.".to_string()),
        Some(d) if d > 3.0 => {
            out.push("키워드 밀도를 3% 이하로 줄여주세요. (과도한 키워드 삽입)".to_string())
        }
        _ => {}
    }

    out
}
