use serde::Deserialize;

/// Placeholder value shipped in `.env.example`; treated as "not configured".
const API_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Raw GEMINI_API_KEY value, if the variable was set at all.
    /// Use [`Config::gemini_api_key`] to get a usable key.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            // Trimmed in case .env has a trailing space. Not required at
            // startup; an absent key surfaces as HTTP 503 at request time.
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("GEMINI_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })
                .transpose()?
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
            gemini_timeout_secs: std::env::var("GEMINI_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("GEMINI_TIMEOUT_SECS must be a positive integer"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Gemini model: {}", config.gemini_model);
        tracing::debug!("Gemini base URL: {}", config.gemini_base_url);
        tracing::debug!("Server Port: {}", config.port);
        if config.gemini_api_key().is_none() {
            tracing::warn!("GEMINI_API_KEY not set or placeholder; analysis endpoints will return 503");
        }

        Ok(config)
    }

    /// Returns the API key only when it is usable: set, non-blank, and not
    /// the `.env.example` placeholder.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != API_KEY_PLACEHOLDER)
    }
}
