//! Keyword library behaviour over the in-memory recommendation store.

use std::sync::Arc;

use autobot_core::{
    Error, Feedback, ListRecommendationsRequest, Recommendation, StaticIdentity,
};
use autobot_db::memory::InMemoryRecommendedKeywordRepository;
use autobot_keywords::{FixedMetricsProvider, KeywordLibrary, RecommendOptions, Recommender};
use uuid::Uuid;

async fn sample_recommendations() -> Vec<autobot_core::RecommendedKeyword> {
    let provider = FixedMetricsProvider::new()
        .with("react hooks", 5000, 20.0)
        .with("vue router", 2000, 45.0)
        .with("svelte stores guide", 300, 10.0);
    let options = RecommendOptions {
        prioritize_longtail: false,
        min_score: 0.0,
        ..Default::default()
    };
    Recommender::new(Arc::new(provider))
        .recommend("react hooks, vue router, svelte stores guide", &options)
        .await
        .unwrap()
}

fn library_for(user: Option<Uuid>) -> (KeywordLibrary, Arc<InMemoryRecommendedKeywordRepository>) {
    let repo = Arc::new(InMemoryRecommendedKeywordRepository::new());
    let identity = match user {
        Some(id) => StaticIdentity::signed_in(id),
        None => StaticIdentity::anonymous(),
    };
    (KeywordLibrary::new(repo.clone(), Arc::new(identity)), repo)
}

#[tokio::test]
async fn test_anonymous_user_rejected() {
    let (library, _) = library_for(None);
    let recs = sample_recommendations().await;

    assert!(matches!(
        library.save(&recs).await.unwrap_err(),
        Error::NotAuthenticated(_)
    ));
    assert!(matches!(
        library
            .list(ListRecommendationsRequest::default())
            .await
            .unwrap_err(),
        Error::NotAuthenticated(_)
    ));
    assert!(matches!(
        library.mark_used(Uuid::new_v4()).await.unwrap_err(),
        Error::NotAuthenticated(_)
    ));
}

#[tokio::test]
async fn test_save_assigns_ids_and_lists_by_score() {
    let user = Uuid::new_v4();
    let (library, _) = library_for(Some(user));
    let saved = library.save(&sample_recommendations().await).await.unwrap();

    assert_eq!(saved.len(), 3);
    assert!(saved.iter().all(|r| r.id.is_some()));
    assert!(saved.iter().all(|r| r.user_id == Some(user)));

    let listed = library
        .list(ListRecommendationsRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
    for pair in listed.windows(2) {
        assert!(pair[0].score.final_score >= pair[1].score.final_score);
    }

    let high_only = library
        .list(ListRecommendationsRequest {
            recommendation: Some(Recommendation::High),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(high_only
        .iter()
        .all(|r| r.score.recommendation == Recommendation::High));
}

#[tokio::test]
async fn test_resave_keeps_identity_and_used_state() {
    let user = Uuid::new_v4();
    let (library, _) = library_for(Some(user));
    let recs = sample_recommendations().await;

    let first = library.save(&recs).await.unwrap();
    let id = first[0].id.unwrap();
    library.mark_used(id).await.unwrap();

    let second = library.save(&recs).await.unwrap();
    let again = second.iter().find(|r| r.id == Some(id)).unwrap();
    assert!(again.used);

    let all = library
        .list(ListRecommendationsRequest::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_mark_used_idempotent() {
    let user = Uuid::new_v4();
    let (library, _) = library_for(Some(user));
    let saved = library.save(&sample_recommendations().await).await.unwrap();
    let id = saved[1].id.unwrap();

    let once = library.mark_used(id).await.unwrap();
    assert!(once.used);
    let used_at = once.used_at.expect("used_at set");

    let twice = library.mark_used(id).await.unwrap();
    assert!(twice.used);
    assert_eq!(twice.used_at, Some(used_at));

    let unused = library
        .list(ListRecommendationsRequest {
            used: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(unused.len(), 2);
}

#[tokio::test]
async fn test_mark_used_unknown_id() {
    let (library, _) = library_for(Some(Uuid::new_v4()));
    library.save(&sample_recommendations().await).await.unwrap();
    assert!(matches!(
        library.mark_used(Uuid::new_v4()).await.unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn test_users_are_isolated() {
    let repo = Arc::new(InMemoryRecommendedKeywordRepository::new());
    let alice = KeywordLibrary::new(
        repo.clone(),
        Arc::new(StaticIdentity::signed_in(Uuid::new_v4())),
    );
    let bob = KeywordLibrary::new(
        repo.clone(),
        Arc::new(StaticIdentity::signed_in(Uuid::new_v4())),
    );

    let saved = alice.save(&sample_recommendations().await).await.unwrap();
    assert!(bob
        .list(ListRecommendationsRequest::default())
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        bob.mark_used(saved[0].id.unwrap()).await.unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn test_feedback_set_and_cleared() {
    let (library, _) = library_for(Some(Uuid::new_v4()));
    let saved = library.save(&sample_recommendations().await).await.unwrap();
    let id = saved[0].id.unwrap();

    let rec = library
        .set_feedback(id, Some(Feedback::Positive))
        .await
        .unwrap();
    assert_eq!(rec.feedback, Some(Feedback::Positive));

    let rec = library.set_feedback(id, None).await.unwrap();
    assert_eq!(rec.feedback, None);
}
