//! autobot: keyword recommendation, SEO, and publishing tools.

mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use autobot_blogger::{
    next_publish_time, parse_publish_time, validate_api_key, GoogleOAuthClient, OAuthClientConfig,
};
use autobot_content::{optimize_seo, reconstruct_blog_post, ReconstructionRequest, SeoRequest};
use autobot_core::{
    split_query, ApiKeyKind, AppConfig, BlogAnalysis, KeywordMetrics, ListRecommendationsRequest,
    Recommendation, StaticIdentity, UserApiKeys,
};
use autobot_crypto::SecretBox;
use autobot_db::Database;
use autobot_keywords::{
    analyze, score, AnalysisOptions, DocumentKeywords, KeywordLibrary, RecommendOptions,
    Recommender, WordCountEstimator,
};

#[derive(Parser)]
#[command(name = "autobot")]
#[command(author, version, about = "Keyword, SEO, and publishing tools for Blogger")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScoringArgs {
    /// Minimum final score kept
    #[arg(long, default_value_t = autobot_core::defaults::MIN_SCORE)]
    min_score: f64,

    /// Seed the metrics estimator for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

impl ScoringArgs {
    fn recommender(&self) -> Recommender {
        let estimator = match self.seed {
            Some(seed) => WordCountEstimator::seeded(seed),
            None => WordCountEstimator::new(),
        };
        Recommender::new(Arc::new(estimator))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score one keyword from known metrics
    Score {
        keyword: String,

        /// Monthly search volume
        #[arg(long)]
        volume: Option<u64>,

        /// Competition level, 0-100
        #[arg(long)]
        competition: Option<f64>,

        /// Blog domain authority, 0-100
        #[arg(long)]
        domain_authority: Option<f64>,

        /// Recent post performance, 0-100
        #[arg(long)]
        performance: Option<f64>,
    },

    /// Score and rank keywords for a query (comma or newline separated)
    Recommend {
        query: String,

        #[command(flatten)]
        scoring: ScoringArgs,

        /// Result window
        #[arg(long, default_value_t = autobot_core::defaults::MAX_RESULTS)]
        max_results: usize,

        /// Score the query keywords only, without longtail expansion
        #[arg(long)]
        no_longtail: bool,

        /// Save the results to this user's keyword library
        #[arg(long)]
        save_for: Option<Uuid>,
    },

    /// Longtail-only recommendations for base keywords
    Longtail {
        #[arg(required = true, num_args = 1..)]
        keywords: Vec<String>,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Top recommendations for a topic domain
    Trending {
        #[arg(short, long)]
        domain: Option<String>,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// List a user's stored recommendations
    Library {
        #[arg(long)]
        user: Uuid,

        /// Only unused keywords
        #[arg(long)]
        unused: bool,

        /// Tier filter: high, medium, or low
        #[arg(long)]
        tier: Option<String>,

        #[arg(long, default_value_t = autobot_core::defaults::LIST_LIMIT)]
        limit: i64,
    },

    /// Keyword frequency analysis over text files
    Analyze {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        #[arg(long, default_value_t = autobot_core::defaults::ANALYSIS_TOP_N)]
        top_n: usize,

        #[arg(long, default_value_t = autobot_core::defaults::ANALYSIS_MIN_FREQUENCY)]
        min_frequency: u32,

        /// Pattern table: ai, tech, or default
        #[arg(long, default_value = "default")]
        domain: String,
    },

    /// SEO report for an HTML draft
    Seo {
        #[arg(short, long)]
        title: String,

        /// HTML file with the post body
        #[arg(short, long)]
        content: PathBuf,

        /// Keywords, most important first (comma separated)
        #[arg(short, long)]
        keywords: String,

        /// Base URL for internal link suggestions
        #[arg(long)]
        target_url: Option<String>,
    },

    /// Rebuild a plain-text draft around recommended keywords
    Reconstruct {
        /// Plain-text draft file
        #[arg(short, long)]
        content: PathBuf,

        /// Keyword query to score (comma separated)
        #[arg(short, long)]
        keywords: String,

        #[arg(long, default_value_t = autobot_core::defaults::RECONSTRUCTION_TARGET_LENGTH)]
        target_length: usize,

        #[arg(long)]
        no_images: bool,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Next publish time for a daily schedule
    NextPublish {
        /// Local time, HH:MM
        #[arg(short, long)]
        time: String,

        /// IANA name or ±HH:MM (default from config)
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Check an API key's format
    ValidateKey {
        /// google_api_key, google_client_id, google_client_secret, suno_api_key,
        /// context7_api_key, or openai_api_key
        kind: String,
        key: String,
    },

    /// Seal a secret with the configured master key
    Seal { value: String },

    /// Open a sealed secret with the configured master key
    Open { value: String },

    /// Print a Google consent URL for Blogger access
    AuthUrl {
        #[arg(long)]
        client_id: String,

        #[arg(long)]
        client_secret: String,
    },

    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(subsystem = "cli", error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    debug!(subsystem = "cli", ?config, "Configuration loaded");

    match cli.command {
        Commands::Score {
            keyword,
            volume,
            competition,
            domain_authority,
            performance,
        } => {
            let mut metrics = KeywordMetrics::new(keyword.as_str());
            metrics.search_volume = volume;
            metrics.competition_level = competition;
            let blog = (domain_authority.is_some() || performance.is_some()).then(|| BlogAnalysis {
                domain_authority,
                recent_post_performance: performance,
                ..Default::default()
            });
            print_json(&score(&keyword, &metrics, blog.as_ref()))
        }
        Commands::Recommend {
            query,
            scoring,
            max_results,
            no_longtail,
            save_for,
        } => {
            let options = RecommendOptions {
                min_score: scoring.min_score,
                max_results,
                prioritize_longtail: !no_longtail,
                ..Default::default()
            };
            let recs = scoring.recommender().recommend(&query, &options).await?;

            match save_for {
                Some(user_id) => {
                    let db = connect(&config).await?;
                    let library = KeywordLibrary::new(
                        db.recommendations.clone(),
                        Arc::new(StaticIdentity::signed_in(user_id)),
                    );
                    let saved = library.save(&recs).await?;
                    info!(subsystem = "cli", %user_id, result_count = saved.len(), "Saved recommendations");
                    print_json(&saved)
                }
                None => print_json(&recs),
            }
        }
        Commands::Longtail { keywords, scoring } => {
            let options = RecommendOptions {
                min_score: scoring.min_score,
                ..Default::default()
            };
            let recs = scoring
                .recommender()
                .recommend_longtail(&keywords, &options)
                .await?;
            print_json(&recs)
        }
        Commands::Trending { domain, scoring } => {
            let options = RecommendOptions {
                min_score: scoring.min_score,
                ..Default::default()
            };
            let recs = scoring
                .recommender()
                .recommend_trending(domain.as_deref(), &options)
                .await?;
            print_json(&recs)
        }
        Commands::Library {
            user,
            unused,
            tier,
            limit,
        } => {
            let recommendation = tier
                .as_deref()
                .map(str::parse::<Recommendation>)
                .transpose()?;
            let db = connect(&config).await?;
            let library = KeywordLibrary::new(
                db.recommendations.clone(),
                Arc::new(StaticIdentity::signed_in(user)),
            );
            let rows = library
                .list(ListRecommendationsRequest {
                    used: unused.then_some(false),
                    recommendation,
                    limit,
                })
                .await?;
            print_json(&rows)
        }
        Commands::Analyze {
            files,
            top_n,
            min_frequency,
            domain,
        } => {
            let mut documents = Vec::with_capacity(files.len());
            for file in &files {
                let text = read_file(file)?;
                documents.push(DocumentKeywords::from_text(file.display().to_string(), &text));
            }
            let options = AnalysisOptions {
                top_n,
                min_frequency,
                domain,
                ..Default::default()
            };
            print_json(&analyze(&documents, &options))
        }
        Commands::Seo {
            title,
            content,
            keywords,
            target_url,
        } => {
            let request = SeoRequest {
                title,
                content: read_file(&content)?,
                keywords: split_query(&keywords),
                target_url,
            };
            print_json(&optimize_seo(&request))
        }
        Commands::Reconstruct {
            content,
            keywords,
            target_length,
            no_images,
            scoring,
        } => {
            let options = RecommendOptions {
                min_score: scoring.min_score,
                prioritize_longtail: false,
                ..Default::default()
            };
            let recs = scoring.recommender().recommend(&keywords, &options).await?;
            let mut request = ReconstructionRequest::from_recommendations(read_file(&content)?, &recs);
            request.target_length = target_length;
            request.include_images = !no_images;
            print_json(&reconstruct_blog_post(&request))
        }
        Commands::NextPublish { time, timezone } => {
            let publish_time = parse_publish_time(&time)?;
            let timezone = timezone.unwrap_or_else(|| config.default_timezone.clone());
            let next = next_publish_time(publish_time, &timezone, Utc::now())?;
            println!("{}", next.to_rfc3339());
            Ok(())
        }
        Commands::ValidateKey { kind, key } => {
            let kind: ApiKeyKind = kind.parse()?;
            let result = validate_api_key(kind, &key);
            print_json(&result)?;
            if !result.valid {
                bail!("invalid {}", kind.column());
            }
            Ok(())
        }
        Commands::Seal { value } => {
            println!("{}", secret_box(&config)?.seal(&value)?);
            Ok(())
        }
        Commands::Open { value } => {
            println!("{}", secret_box(&config)?.open(&value)?);
            Ok(())
        }
        Commands::AuthUrl {
            client_id,
            client_secret,
        } => {
            let keys = UserApiKeys {
                google_client_id: Some(client_id),
                google_client_secret: Some(client_secret),
                ..Default::default()
            };
            let client = GoogleOAuthClient::new(OAuthClientConfig::from_keys(&keys, &config)?)?;
            let request = client.authorization_url();
            println!("{}", request.url);
            eprintln!("state: {}", request.state);
            Ok(())
        }
        Commands::Migrate => {
            let db = connect(&config).await?;
            info!(subsystem = "cli", "Running database migrations...");
            db.migrate().await?;
            info!(subsystem = "cli", "Database migrations complete");
            Ok(())
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<Database> {
    info!(subsystem = "cli", "Connecting to database...");
    Ok(Database::from_config(config).await?)
}

fn secret_box(config: &AppConfig) -> anyhow::Result<SecretBox> {
    let master = config
        .master_key
        .as_deref()
        .context("AUTOBOT_MASTER_KEY is not set")?;
    Ok(SecretBox::from_master_key(master, config.key_salt.as_deref())?)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recommend_defaults() {
        let cli = Cli::try_parse_from(["autobot", "recommend", "러스트, 파이썬"]).unwrap();
        match cli.command {
            Commands::Recommend {
                query,
                scoring,
                max_results,
                no_longtail,
                save_for,
            } => {
                assert_eq!(query, "러스트, 파이썬");
                assert_eq!(scoring.min_score, 50.0);
                assert!(scoring.seed.is_none());
                assert_eq!(max_results, 20);
                assert!(!no_longtail);
                assert!(save_for.is_none());
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_parse_score_metrics() {
        let cli = Cli::try_parse_from([
            "autobot",
            "score",
            "react hooks",
            "--volume",
            "5000",
            "--competition",
            "20",
        ])
        .unwrap();
        match cli.command {
            Commands::Score {
                keyword,
                volume,
                competition,
                domain_authority,
                ..
            } => {
                assert_eq!(keyword, "react hooks");
                assert_eq!(volume, Some(5000));
                assert_eq!(competition, Some(20.0));
                assert!(domain_authority.is_none());
            }
            _ => panic!("expected score"),
        }
    }

    #[test]
    fn test_longtail_requires_keywords() {
        assert!(Cli::try_parse_from(["autobot", "longtail"]).is_err());
        assert!(Cli::try_parse_from(["autobot", "longtail", "react", "--seed", "7"]).is_ok());
    }
}
