//! Configuration loader — defaults, then config.toml, then env overrides.

use std::path::Path;

use common::Error;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Finnhub API key (quotes + general news).
    #[serde(default)]
    pub finnhub_api_key: String,

    /// Marketaux API key (symbol-scoped news).
    #[serde(default)]
    pub marketaux_api_key: String,

    /// Anthropic API key for the sentiment classifier. Optional: without it
    /// every headline is treated as Neutral.
    #[serde(default)]
    pub anthropic_api_key: String,

    #[serde(default)]
    pub symbols: SymbolsConfig,

    #[serde(default)]
    pub quotes: QuotesConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Quote symbols for the four market signals.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolsConfig {
    /// Index price symbol.
    #[serde(default = "default_index_symbol")]
    pub index: String,
    /// Volatility index symbol.
    #[serde(default = "default_volatility_symbol")]
    pub volatility: String,
    /// Near-term futures symbol (current price and previous settle).
    #[serde(default = "default_futures_symbol")]
    pub futures: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotesConfig {
    #[serde(default = "default_quote_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// Symbol filter for the Marketaux feed.
    #[serde(default = "default_news_symbols")]
    pub symbols: String,
    #[serde(default = "default_news_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Disable to run without any delivery configured.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// HTTP mail relay endpoint.
    #[serde(default)]
    pub relay_url: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default = "default_email_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Exchange-local offset from UTC, in whole hours.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Path of the append-only prediction CSV.
    #[serde(default = "default_log_path")]
    pub path: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_index_symbol() -> String {
    "^GSPC".into()
}
fn default_volatility_symbol() -> String {
    "^VIX".into()
}
fn default_futures_symbol() -> String {
    "ES=F".into()
}

fn default_quote_timeout_ms() -> u64 {
    10_000
}

fn default_news_symbols() -> String {
    "SPY".into()
}
fn default_news_timeout_ms() -> u64 {
    10_000
}

fn default_llm_provider() -> String {
    "anthropic".into()
}
fn default_llm_model() -> String {
    "claude-3-5-haiku-latest".into()
}
fn default_llm_timeout_ms() -> u64 {
    15_000
}
fn default_llm_max_retries() -> u32 {
    2
}

fn default_email_timeout_ms() -> u64 {
    10_000
}

fn default_utc_offset_hours() -> i32 {
    -5
}

fn default_log_path() -> String {
    "market_predictions.csv".into()
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            index: default_index_symbol(),
            volatility: default_volatility_symbol(),
            futures: default_futures_symbol(),
        }
    }
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_quote_timeout_ms(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            symbols: default_news_symbols(),
            timeout_ms: default_news_timeout_ms(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            timeout_ms: default_llm_timeout_ms(),
            max_retries: default_llm_max_retries(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            relay_url: String::new(),
            from: String::new(),
            to: String::new(),
            timeout_ms: default_email_timeout_ms(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            finnhub_api_key: String::new(),
            marketaux_api_key: String::new(),
            anthropic_api_key: String::new(),
            symbols: SymbolsConfig::default(),
            quotes: QuotesConfig::default(),
            news: NewsConfig::default(),
            llm: LlmConfig::default(),
            email: EmailConfig::default(),
            schedule: ScheduleConfig::default(),
            log: LogConfig::default(),
        }
    }
}

// ── Loading & validation ──────────────────────────────────────────────

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.symbols.index.trim().is_empty() {
        issues.push("symbols.index must not be empty".into());
    }
    if config.symbols.volatility.trim().is_empty() {
        issues.push("symbols.volatility must not be empty".into());
    }
    if config.symbols.futures.trim().is_empty() {
        issues.push("symbols.futures must not be empty".into());
    }

    if config.quotes.timeout_ms == 0 {
        issues.push("quotes.timeout_ms must be > 0".into());
    }
    if config.news.timeout_ms == 0 {
        issues.push("news.timeout_ms must be > 0".into());
    }
    if config.llm.timeout_ms == 0 {
        issues.push("llm.timeout_ms must be > 0".into());
    }
    if config.email.timeout_ms == 0 {
        issues.push("email.timeout_ms must be > 0".into());
    }

    if config.email.enabled {
        if config.email.relay_url.trim().is_empty() {
            issues.push("email.relay_url is required when email is enabled".into());
        }
        if config.email.from.trim().is_empty() {
            issues.push("email.from is required when email is enabled".into());
        }
        if config.email.to.trim().is_empty() {
            issues.push("email.to is required when email is enabled".into());
        }
    }

    if !(-12..=14).contains(&config.schedule.utc_offset_hours) {
        issues.push("schedule.utc_offset_hours must be in [-12, 14]".into());
    }

    if config.log.path.trim().is_empty() {
        issues.push("log.path must not be empty".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load configuration from defaults, optional `config.toml`, and environment.
pub fn load_config() -> Result<AppConfig, Error> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let mut config = AppConfig::default();

    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
        config.finnhub_api_key = key;
    }
    if let Ok(key) = std::env::var("MARKETAUX_API_KEY") {
        config.marketaux_api_key = key;
    }
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        config.anthropic_api_key = key;
    }
    if let Ok(url) = std::env::var("EMAIL_RELAY_URL") {
        config.email.relay_url = url;
    }
    if let Ok(from) = std::env::var("EMAIL_FROM") {
        config.email.from = from;
    }
    if let Ok(to) = std::env::var("EMAIL_TO") {
        config.email.to = to;
    }
    if let Ok(path) = std::env::var("PREDICTION_LOG_PATH") {
        config.log.path = path;
    }
    if let Ok(raw) = std::env::var("PREMARKET_UTC_OFFSET_HOURS") {
        config.schedule.utc_offset_hours = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::Config("PREMARKET_UTC_OFFSET_HOURS must be an integer".into()))?;
    }

    // Missing keys degrade the matching source, they do not stop the run.
    if config.finnhub_api_key.is_empty() {
        warn!("FINNHUB_API_KEY not set — quotes and Finnhub news will be unavailable");
    }
    if config.marketaux_api_key.is_empty() {
        warn!("MARKETAUX_API_KEY not set — Marketaux news will be unavailable");
    }
    if config.anthropic_api_key.is_empty() {
        warn!("ANTHROPIC_API_KEY not set — all headlines will classify as Neutral");
    }

    validate_config(&config)?;

    Ok(config)
}
