//! End-to-end content optimization over realistic drafts.

use autobot_content::{optimize_seo, reconstruct_blog_post, ReconstructionRequest, SeoRequest};
use autobot_core::{KeywordScore, KeywordType, Recommendation, RecommendedKeyword};
use chrono::Utc;

fn draft_html() -> String {
    let mut html = String::from("<h2>시작하기</h2><p>러스트는 시스템 프로그래밍 언어입니다.</p>");
    html.push_str("<img src=\"a.png\" alt=\"러스트 로고\"><img src=\"b.png\">");
    html.push_str("<h2>소유권</h2><p>소유권은 메모리를 안전하게 관리합니다.</p>");
    html
}

fn recommendation(keyword: &str, final_score: f64) -> RecommendedKeyword {
    RecommendedKeyword::unsaved(KeywordScore {
        keyword: keyword.to_string(),
        search_volume: Some(1200),
        competition_level: Some(35.0),
        keyword_type: KeywordType::Small,
        word_count: 1,
        final_score,
        search_volume_score: 20.0,
        competition_score: 30.0,
        blog_fit_score: final_score - 50.0,
        recommendation: Recommendation::from_score(final_score),
    }, Utc::now())
}

#[test]
fn test_seo_report_shape() {
    let report = optimize_seo(&SeoRequest {
        title: "러스트 입문".to_string(),
        content: draft_html(),
        keywords: vec!["러스트".to_string(), "소유권".to_string()],
        target_url: Some("https://blog.example.com/".to_string()),
    });

    assert!(report.title.contains("러스트"));
    assert!(report.seo_score <= 100);
    assert_eq!(report.image_alt_texts, vec!["러스트 로고", "러스트 관련 이미지"]);
    assert_eq!(
        report.internal_links[0],
        "https://blog.example.com/%EB%9F%AC%EC%8A%A4%ED%8A%B8"
    );
    assert!(report.meta_description.chars().count() <= 160);
    assert!(!report.recommendations.is_empty());
}

#[test]
fn test_seo_report_serializes() {
    let report = optimize_seo(&SeoRequest {
        title: "t".to_string(),
        content: String::new(),
        keywords: Vec::new(),
        target_url: None,
    });
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("seo_score").is_some());
    assert!(json["internal_links"].as_array().unwrap().is_empty());
}

#[test]
fn test_reconstruct_from_recommendations() {
    let recs = vec![recommendation("소유권", 72.0), recommendation("러스트", 88.0)];
    let request = ReconstructionRequest::from_recommendations(
        "러스트는 빠릅니다.\n\n메모리 안전성이 장점입니다.",
        &recs,
    );
    assert_eq!(request.target_length, 2000);

    let post = reconstruct_blog_post(&request);
    assert_eq!(post.keywords, vec!["러스트", "소유권"]);
    assert!(post.content.starts_with("<p>러스트는 빠릅니다.</p>"));
    assert!(post.content.contains("소유권에 대해 더 알아보겠습니다."));
    assert_eq!(post.h2_tags[0], "<h2>러스트</h2>");
    assert!(post.seo_score <= 100);
}

#[test]
fn test_reconstruct_without_keywords() {
    let post = reconstruct_blog_post(&ReconstructionRequest::new("본문", Vec::new()));
    assert!(post.title.starts_with("주제"));
    assert_eq!(post.content, "<p>본문</p>\n\n");
    assert!(post.h2_tags.is_empty());
    assert!(post.suggested_images.is_empty());
}
