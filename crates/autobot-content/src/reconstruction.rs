//! Keyword-driven post reconstruction.
//!
//! Rebuilds an existing draft around recommended keywords: a keyword-led
//! title, paragraph-wrapped body with keywords worked in, H2 headings, meta
//! description, image suggestions, and an SEO score with keyword bonuses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use autobot_core::defaults::RECONSTRUCTION_TARGET_LENGTH;
use autobot_core::text::{char_len, truncate_with_ellipsis};
use autobot_core::{strip_html, KeywordScore, RecommendedKeyword};

use crate::html::{h2_elements, paragraphs};
use crate::seo::{density_points, describe, h2_points, meta_points, title_points};

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?。！？]").expect("valid regex"));

/// Title used when no keyword is available.
const FALLBACK_SUBJECT: &str = "주제";

/// Click-through phrases appended to short titles.
const CLICK_PHRASES: [&str; 4] = ["완벽 가이드", "초보자 가이드", "이란?", "사용법"];

/// Image search base for suggested images.
const IMAGE_SEARCH_URL: &str = "https://unsplash.com/s/photos/";

const MAX_IMAGE_SUGGESTIONS: usize = 3;

/// Bonus points for the main keyword in the title, first H2, or meta.
const KEYWORD_BONUS: u32 = 5;

/// Reconstruction input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionRequest {
    /// Plain-text draft, paragraphs separated by blank lines.
    pub original_content: String,
    /// Scored keywords in any order.
    pub keywords: Vec<KeywordScore>,
    /// Target body length in characters.
    pub target_length: usize,
    /// Work secondary keywords into later paragraphs.
    pub optimize_seo: bool,
    pub include_images: bool,
}

impl ReconstructionRequest {
    pub fn new(original_content: impl Into<String>, keywords: Vec<KeywordScore>) -> Self {
        Self {
            original_content: original_content.into(),
            keywords,
            target_length: RECONSTRUCTION_TARGET_LENGTH,
            optimize_seo: true,
            include_images: true,
        }
    }

    /// Build from stored recommendations.
    pub fn from_recommendations(
        original_content: impl Into<String>,
        recommendations: &[RecommendedKeyword],
    ) -> Self {
        Self::new(
            original_content,
            recommendations.iter().map(|r| r.score.clone()).collect(),
        )
    }
}

/// Reconstruction output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedPost {
    pub title: String,
    /// HTML body.
    pub content: String,
    pub h2_tags: Vec<String>,
    pub meta_description: String,
    pub suggested_images: Vec<String>,
    /// Keywords, highest score first.
    pub keywords: Vec<String>,
    /// 0–100
    pub seo_score: u32,
}

/// Rebuild a draft around its keywords.
pub fn reconstruct_blog_post(request: &ReconstructionRequest) -> ReconstructedPost {
    let keywords = ranked_keywords(&request.keywords);

    let title = seo_title(&keywords);
    let content = reconstruct_content(
        &request.original_content,
        &keywords,
        request.target_length,
        request.optimize_seo,
    );
    let h2_tags = optimized_h2_tags(&keywords, &content);
    let meta_description = describe(&content, &keywords, false);
    let suggested_images = if request.include_images {
        image_suggestions(&keywords)
    } else {
        Vec::new()
    };
    let seo_score = reconstruction_score(&title, &content, &h2_tags, &keywords, &meta_description);

    debug!(
        subsystem = "content",
        component = "reconstruction",
        op = "reconstruct",
        keyword_count = keywords.len(),
        content_chars = char_len(&content),
        seo_score,
        "Post reconstruction complete"
    );

    ReconstructedPost {
        title,
        content,
        h2_tags,
        meta_description,
        suggested_images,
        keywords,
        seo_score,
    }
}

/// Keyword strings ordered by final score, highest first (stable).
pub fn ranked_keywords(scores: &[KeywordScore]) -> Vec<String> {
    let mut sorted: Vec<&KeywordScore> = scores.iter().collect();
    sorted.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.into_iter().map(|s| s.keyword.clone()).collect()
}

/// Keyword-led title of at most 60 characters.
///
/// The second keyword is added while the title is under 40 characters and a
/// click phrase while under 50. The phrase is picked from the main keyword's
/// length so the same keywords always give the same title.
pub fn seo_title(keywords: &[String]) -> String {
    let main = keywords
        .first()
        .map(String::as_str)
        .unwrap_or(FALLBACK_SUBJECT);
    let mut title = main.to_string();

    if let Some(second) = keywords.get(1) {
        if char_len(&title) < 40 {
            title.push(' ');
            title.push_str(second);
        }
    }

    if char_len(&title) < 50 {
        let phrase = CLICK_PHRASES[char_len(main) % CLICK_PHRASES.len()];
        title.push(' ');
        title.push_str(phrase);
    }

    truncate_with_ellipsis(&title, 60)
}

/// Append a closing sentence that mentions `keyword`.
fn insert_keyword_naturally(paragraph: &str, keyword: &str) -> String {
    let sentences: Vec<&str> = SENTENCE_END
        .split(paragraph)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        return format!("{}에 대해 더 알아보겠습니다.", keyword);
    }
    format!("{}. {}에 대해 더 알아보겠습니다.", sentences.join(". "), keyword)
}

/// Filler sections for secondary keywords, stopping once `budget`
/// characters are produced.
fn additional_content(keywords: &[String], budget: usize) -> String {
    let mut additional = String::new();
    for keyword in keywords.iter().skip(1).take(3) {
        if char_len(&additional) >= budget {
            break;
        }
        additional.push_str(&format!("<h2>{}</h2>\n\n", keyword));
        additional.push_str(&format!(
            "<p>{kw}에 대한 상세한 내용을 다루겠습니다. {kw}의 특징과 활용 방법을 알아보겠습니다.</p>\n\n",
            kw = keyword
        ));
    }
    additional
}

/// Keep whole paragraphs while they fit in `max_length` characters.
fn truncate_content(content: &str, max_length: usize) -> String {
    if char_len(content) <= max_length {
        return content.to_string();
    }

    let mut truncated = String::new();
    for paragraph in content.split("\n\n").filter(|p| !p.is_empty()) {
        if char_len(&truncated) + char_len(paragraph) > max_length {
            break;
        }
        truncated.push_str(paragraph);
        truncated.push_str("\n\n");
    }
    truncated.trim().to_string()
}

/// Paragraph-wrapped body with keywords worked in, sized toward
/// `target_length`.
///
/// The first paragraph is introduced by the main keyword when it lacks it.
/// With `optimize_seo`, paragraph `i` gets keyword `i` when missing. Short
/// bodies are extended with sections for up to three secondary keywords;
/// bodies over 120% of the target are cut at a paragraph boundary.
pub fn reconstruct_content(
    original: &str,
    keywords: &[String],
    target_length: usize,
    optimize_seo: bool,
) -> String {
    let mut out = String::new();

    for (i, paragraph) in paragraphs(original).into_iter().enumerate() {
        let body = if i == 0 {
            match keywords.first() {
                Some(main) if !paragraph.contains(main.as_str()) => {
                    format!("{}에 대해 알아보겠습니다. {}", main, paragraph)
                }
                _ => paragraph.to_string(),
            }
        } else {
            match keywords.get(i) {
                Some(kw) if optimize_seo && !paragraph.contains(kw.as_str()) => {
                    insert_keyword_naturally(paragraph, kw)
                }
                _ => paragraph.to_string(),
            }
        };
        out.push_str(&format!("<p>{}</p>\n\n", body));
    }

    let len = char_len(&out);
    if len < target_length {
        out.push_str(&additional_content(keywords, target_length - len));
    } else if len as f64 > target_length as f64 * 1.2 {
        out = truncate_content(&out, target_length);
    }

    out
}

/// H2s for every leading keyword (up to five), then up to three existing
/// headings from the body that are not already listed.
pub fn optimized_h2_tags(keywords: &[String], content: &str) -> Vec<String> {
    let mut tags: Vec<String> = keywords
        .iter()
        .take(5)
        .map(|k| format!("<h2>{}</h2>", k))
        .collect();

    for h2 in h2_elements(content).into_iter().take(3) {
        if !tags.contains(&h2) {
            tags.push(h2);
        }
    }
    tags
}

/// Image search links for the top three keywords.
pub fn image_suggestions(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .take(MAX_IMAGE_SUGGESTIONS)
        .map(|k| format!("{}{}", IMAGE_SEARCH_URL, urlencoding::encode(k)))
        .collect()
}

fn length_points(content: &str) -> u32 {
    match char_len(&strip_html(content)) {
        n if n >= 1500 => 20,
        n if n >= 1000 => 15,
        n if n >= 500 => 10,
        _ => 5,
    }
}

/// SEO score for a reconstructed post, capped at 100.
///
/// Title, H2, density, and meta points as in [`crate::seo::seo_score`],
/// plus body length points and a bonus for the main keyword in the title,
/// first H2, and meta description.
pub fn reconstruction_score(
    title: &str,
    content: &str,
    h2_tags: &[String],
    keywords: &[String],
    meta_description: &str,
) -> u32 {
    let main = keywords.first().map(String::as_str);
    let bonus = |text: &str| match main {
        Some(kw) if text.contains(kw) => KEYWORD_BONUS,
        _ => 0,
    };

    let first_h2_bonus = match h2_tags.first() {
        Some(first) => match main {
            Some(kw) if !first.contains(kw) => 0,
            _ => KEYWORD_BONUS,
        },
        None => 0,
    };

    let total = title_points(title)
        + bonus(title)
        + h2_points(h2_tags)
        + first_h2_bonus
        + density_points(content, keywords)
        + length_points(content)
        + meta_points(meta_description)
        + bonus(meta_description);
    total.min(100)
}
