use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::MatchTuning;
use crate::pipeline::PipelineLimits;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// Built-in catalog when unset.
    pub catalog_path: Option<PathBuf>,
    /// Headline name detection; disable for documents without a name line.
    pub enable_name_detection: bool,
    pub tuning: MatchTuning,
    pub limits: PipelineLimits,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            catalog_path: None,
            enable_name_detection: true,
            tuning: MatchTuning::default(),
            limits: PipelineLimits::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let tuning = MatchTuning {
            fuzzy_threshold: parse_or("FUZZY_THRESHOLD", &lookup, defaults.tuning.fuzzy_threshold)?,
            must_have_weight: parse_or("MUST_HAVE_WEIGHT", &lookup, defaults.tuning.must_have_weight)?,
            nice_to_have_weight: parse_or(
                "NICE_TO_HAVE_WEIGHT",
                &lookup,
                defaults.tuning.nice_to_have_weight,
            )?,
            top_k: parse_or("TOP_K", &lookup, defaults.tuning.top_k)?,
        };
        tuning
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid matcher tuning: {e}"))?;

        Ok(Config {
            port: parse_or("PORT", &lookup, defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", &lookup, defaults.max_upload_bytes)?,
            catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
            enable_name_detection: parse_or(
                "ENABLE_NAME_DETECTION",
                &lookup,
                defaults.enable_name_detection,
            )?,
            tuning,
            limits: PipelineLimits {
                preview_chars: parse_or("PREVIEW_CHARS", &lookup, defaults.limits.preview_chars)?,
                max_text_chars: parse_or("MAX_TEXT_CHARS", &lookup, defaults.limits.max_text_chars)?,
            },
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
