use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub news_api_key: String,
    pub database_url: String,
    pub hub_token: String,
    pub config_path: PathBuf,
    pub log_level: String,
    /// Six-field cron expression (seconds first) for `newsdesk schedule`.
    pub schedule: String,
    pub top_k: usize,
    pub target_language: String,
    pub newsapi_base_url: String,
    pub hub_base_url: String,
    pub translate_url: String,
    pub translate_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub translate_timeout_secs: u64,
    pub sentiment_model: String,
    pub fact_model: String,
    pub keyword_model: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("news_api_key", &"[redacted]")
            .field("database_url", &"[redacted]")
            .field("hub_token", &"[redacted]")
            .field("config_path", &self.config_path)
            .field("log_level", &self.log_level)
            .field("schedule", &self.schedule)
            .field("top_k", &self.top_k)
            .field("target_language", &self.target_language)
            .field("newsapi_base_url", &self.newsapi_base_url)
            .field("hub_base_url", &self.hub_base_url)
            .field("translate_url", &self.translate_url)
            .field(
                "translate_api_key",
                &self.translate_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("translate_timeout_secs", &self.translate_timeout_secs)
            .field("sentiment_model", &self.sentiment_model)
            .field("fact_model", &self.fact_model)
            .field("keyword_model", &self.keyword_model)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
