//! Recommended keyword repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use autobot_core::{
    Error, Feedback, KeywordScore, ListRecommendationsRequest, RecommendedKeyword,
    RecommendedKeywordRepository, Result,
};

const COLUMNS: &str = "id, user_id, keyword, search_volume, competition_level, keyword_type,
    word_count, final_score, search_volume_score, competition_score, blog_fit_score,
    recommendation, collected_at, recommended_at, used, used_at, feedback";

/// PostgreSQL recommended keyword repository.
pub struct PgRecommendedKeywordRepository {
    pool: Pool<Postgres>,
}

impl PgRecommendedKeywordRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> Result<RecommendedKeyword> {
        let search_volume: Option<i64> = row.get("search_volume");
        let word_count: i32 = row.get("word_count");
        let keyword_type: String = row.get("keyword_type");
        let recommendation: String = row.get("recommendation");
        let feedback: Option<String> = row.get("feedback");

        Ok(RecommendedKeyword {
            id: Some(row.get("id")),
            user_id: Some(row.get("user_id")),
            score: KeywordScore {
                keyword: row.get("keyword"),
                search_volume: search_volume.map(|v| v.max(0) as u64),
                competition_level: row.get("competition_level"),
                keyword_type: keyword_type.parse()?,
                word_count: word_count.max(0) as usize,
                final_score: row.get("final_score"),
                search_volume_score: row.get("search_volume_score"),
                competition_score: row.get("competition_score"),
                blog_fit_score: row.get("blog_fit_score"),
                recommendation: recommendation.parse()?,
            },
            collected_at: row.get("collected_at"),
            recommended_at: row.get("recommended_at"),
            used: row.get("used"),
            used_at: row.get("used_at"),
            feedback: feedback.map(|f| f.parse()).transpose()?,
        })
    }
}

#[async_trait]
impl RecommendedKeywordRepository for PgRecommendedKeywordRepository {
    #[instrument(skip(self, recommendations), fields(
        subsystem = "database",
        component = "recommendations",
        op = "upsert",
        count = recommendations.len(),
    ))]
    async fn upsert(
        &self,
        user_id: Uuid,
        recommendations: &[RecommendedKeyword],
    ) -> Result<Vec<RecommendedKeyword>> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO recommended_keywords (
                id, user_id, keyword, search_volume, competition_level, keyword_type,
                word_count, final_score, search_volume_score, competition_score,
                blog_fit_score, recommendation, collected_at, recommended_at
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             ON CONFLICT (user_id, keyword) DO UPDATE SET
                search_volume = EXCLUDED.search_volume,
                competition_level = EXCLUDED.competition_level,
                keyword_type = EXCLUDED.keyword_type,
                word_count = EXCLUDED.word_count,
                final_score = EXCLUDED.final_score,
                search_volume_score = EXCLUDED.search_volume_score,
                competition_score = EXCLUDED.competition_score,
                blog_fit_score = EXCLUDED.blog_fit_score,
                recommendation = EXCLUDED.recommendation,
                collected_at = EXCLUDED.collected_at,
                recommended_at = EXCLUDED.recommended_at
             RETURNING {}",
            COLUMNS
        );

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let mut saved = Vec::with_capacity(recommendations.len());

        for rec in recommendations {
            let score = &rec.score;
            let row = sqlx::query(&sql)
                .bind(Uuid::now_v7())
                .bind(user_id)
                .bind(&score.keyword)
                .bind(score.search_volume.map(|v| v.min(i64::MAX as u64) as i64))
                .bind(score.competition_level)
                .bind(score.keyword_type.as_str())
                .bind(score.word_count as i32)
                .bind(score.final_score)
                .bind(score.search_volume_score)
                .bind(score.competition_score)
                .bind(score.blog_fit_score)
                .bind(score.recommendation.as_str())
                .bind(rec.collected_at.unwrap_or(now))
                .bind(rec.recommended_at.unwrap_or(now))
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;
            saved.push(Self::parse_row(&row)?);
        }

        tx.commit().await.map_err(Error::Database)?;
        debug!(%user_id, result_count = saved.len(), "Upserted recommendations");
        Ok(saved)
    }

    async fn list(
        &self,
        user_id: Uuid,
        req: ListRecommendationsRequest,
    ) -> Result<Vec<RecommendedKeyword>> {
        let sql = format!(
            "SELECT {} FROM recommended_keywords
             WHERE user_id = $1
               AND ($2::boolean IS NULL OR used = $2)
               AND ($3::text IS NULL OR recommendation = $3)
             ORDER BY final_score DESC, keyword ASC
             LIMIT $4",
            COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(req.used)
            .bind(req.recommendation.map(|r| r.as_str()))
            .bind(req.limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(Self::parse_row).collect()
    }

    async fn mark_used(&self, user_id: Uuid, id: Uuid) -> Result<RecommendedKeyword> {
        let sql = format!(
            "UPDATE recommended_keywords
             SET used = TRUE, used_at = COALESCE(used_at, $3)
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("recommended keyword {}", id)))?;

        Self::parse_row(&row)
    }

    async fn set_feedback(
        &self,
        user_id: Uuid,
        id: Uuid,
        feedback: Option<Feedback>,
    ) -> Result<RecommendedKeyword> {
        let sql = format!(
            "UPDATE recommended_keywords SET feedback = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .bind(feedback.map(|f| f.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("recommended keyword {}", id)))?;

        Self::parse_row(&row)
    }
}
