use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_SENTIMENT_MODEL: &str =
    "mrm8488/distilroberta-finetuned-financial-news-sentiment-analysis";
pub const DEFAULT_FACT_MODEL: &str = "hamzab/roberta-fake-news-classification";
pub const DEFAULT_KEYWORD_MODEL: &str = "Voicelab/vlt5-base-keywords";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let news_api_key = require("NEWS_API_KEY")?;
    let database_url = require("DATABASE_URL")?;
    let hub_token = require("HUGGINGFACE_HUB_ACCESS_TOKEN")?;

    let config_path = PathBuf::from(or_default("NEWSDESK_CONFIG_PATH", "./config.json"));
    let log_level = or_default("NEWSDESK_LOG_LEVEL", "info");
    let schedule = parse_schedule(&or_default("NEWSDESK_SCHEDULE", "0 0 */6 * * *"))?;

    let top_k = parse_usize("NEWSDESK_TOP_K", "10")?;
    if top_k == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSDESK_TOP_K".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let target_language = or_default("NEWSDESK_TARGET_LANGUAGE", "en");

    let newsapi_base_url = or_default("NEWSDESK_NEWSAPI_BASE_URL", "https://newsapi.org/v2/");
    let hub_base_url = or_default(
        "NEWSDESK_HUB_BASE_URL",
        "https://api-inference.huggingface.co/",
    );
    let translate_url = or_default("NEWSDESK_TRANSLATE_URL", "https://libretranslate.com/");
    let translate_api_key = lookup("NEWSDESK_TRANSLATE_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let request_timeout_secs = parse_u64("NEWSDESK_REQUEST_TIMEOUT_SECS", "60")?;
    let translate_timeout_secs = parse_u64("NEWSDESK_TRANSLATE_TIMEOUT_SECS", "25")?;

    let sentiment_model = or_default("NEWSDESK_SENTIMENT_MODEL", DEFAULT_SENTIMENT_MODEL);
    let fact_model = or_default("NEWSDESK_FACT_MODEL", DEFAULT_FACT_MODEL);
    let keyword_model = or_default("NEWSDESK_KEYWORD_MODEL", DEFAULT_KEYWORD_MODEL);

    let db_max_connections = parse_u32("NEWSDESK_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("NEWSDESK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("NEWSDESK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        news_api_key,
        database_url,
        hub_token,
        config_path,
        log_level,
        schedule,
        top_k,
        target_language,
        newsapi_base_url,
        hub_base_url,
        translate_url,
        translate_api_key,
        request_timeout_secs,
        translate_timeout_secs,
        sentiment_model,
        fact_model,
        keyword_model,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Shallow check that a schedule has the six whitespace-separated fields the
/// scheduler expects. Full cron validation happens when the job is registered.
fn parse_schedule(raw: &str) -> Result<String, ConfigError> {
    let fields = raw.split_whitespace().count();
    if fields != 6 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSDESK_SCHEDULE".to_string(),
            reason: format!("expected 6 cron fields (sec min hour dom mon dow), got {fields}"),
        });
    }
    Ok(raw.trim().to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
