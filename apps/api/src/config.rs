use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::lifecycle::{OperationPolicy, RetryPolicy};
use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

const DEFAULT_RETRY_DELAY_MS: u64 = 2_000;
const DEFAULT_OPERATION_TTL_SECS: u64 = 900;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub groq_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,
    pub port: u16,
    pub rust_log: String,
    pub policies: FeaturePolicies,
    /// How long a settled career or resume operation is kept after its last read.
    pub operation_ttl: Duration,
}

/// Timeout and retry policy of every feature that calls out.
///
/// Each can be overridden with `<FEATURE>_TIMEOUT_SECS` and
/// `<FEATURE>_RETRY` (`manual` or `auto`); `RETRY_DELAY_MS` sets the delay
/// before an automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturePolicies {
    pub career: OperationPolicy,
    pub resume: OperationPolicy,
    pub interview: OperationPolicy,
    pub job_trends: OperationPolicy,
    pub top_skills: OperationPolicy,
    pub industry_insights: OperationPolicy,
}

impl Default for FeaturePolicies {
    fn default() -> Self {
        let delay = Duration::from_millis(DEFAULT_RETRY_DELAY_MS);
        Self {
            career: OperationPolicy::manual(Duration::from_secs(30)),
            resume: OperationPolicy::manual(Duration::from_secs(30)),
            interview: OperationPolicy::manual(Duration::from_secs(30)),
            job_trends: OperationPolicy::retry_once(Duration::from_secs(10), delay),
            top_skills: OperationPolicy::retry_once(Duration::from_secs(10), delay),
            industry_insights: OperationPolicy::retry_once(Duration::from_secs(8), delay),
        }
    }
}

impl FeaturePolicies {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let delay = match std::env::var("RETRY_DELAY_MS") {
            Ok(raw) => Duration::from_millis(
                raw.parse::<u64>()
                    .context("RETRY_DELAY_MS must be a number of milliseconds")?,
            ),
            Err(_) => Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        };

        let read = |prefix: &str, default: OperationPolicy| -> Result<OperationPolicy> {
            parse_policy(
                prefix,
                std::env::var(format!("{prefix}_TIMEOUT_SECS")).ok().as_deref(),
                std::env::var(format!("{prefix}_RETRY")).ok().as_deref(),
                delay,
                default,
            )
        };

        Ok(Self {
            career: read("CAREER", defaults.career)?,
            resume: read("RESUME", defaults.resume)?,
            interview: read("INTERVIEW", defaults.interview)?,
            job_trends: read("JOB_TRENDS", defaults.job_trends)?,
            top_skills: read("TOP_SKILLS", defaults.top_skills)?,
            industry_insights: read("INDUSTRY_INSIGHTS", defaults.industry_insights)?,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            llm_api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            policies: FeaturePolicies::from_env()?,
            operation_ttl: parse_ttl(std::env::var("OPERATION_TTL_SECS").ok().as_deref())?,
        })
    }
}

fn parse_ttl(raw: Option<&str>) -> Result<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(DEFAULT_OPERATION_TTL_SECS));
    };
    let secs = raw
        .trim()
        .parse::<u64>()
        .context("OPERATION_TTL_SECS must be a whole number")?;
    if secs == 0 {
        bail!("OPERATION_TTL_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_policy(
    prefix: &str,
    timeout_secs: Option<&str>,
    retry: Option<&str>,
    delay: Duration,
    default: OperationPolicy,
) -> Result<OperationPolicy> {
    let timeout = match timeout_secs {
        Some(raw) => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{prefix}_TIMEOUT_SECS must be a whole number"))?;
            if secs == 0 {
                bail!("{prefix}_TIMEOUT_SECS must be greater than zero");
            }
            Duration::from_secs(secs)
        }
        None => default.timeout,
    };

    let retry = match retry.map(|r| r.trim().to_ascii_lowercase()) {
        Some(r) if r == "manual" => RetryPolicy::Manual,
        Some(r) if r == "auto" => RetryPolicy::AutomaticOnce { delay },
        Some(other) => bail!("{prefix}_RETRY must be 'manual' or 'auto', got '{other}'"),
        None => match default.retry {
            RetryPolicy::Manual => RetryPolicy::Manual,
            RetryPolicy::AutomaticOnce { .. } => RetryPolicy::AutomaticOnce { delay },
        },
    };

    Ok(OperationPolicy { timeout, retry })
}
