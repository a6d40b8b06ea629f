use std::path::PathBuf;

pub const DEFAULT_CREDENTIALS_FILE: &str = "./.portana/credentials.json";

pub struct CliConfig {
    pub api_url: Option<String>,
    pub credentials_file: PathBuf,
    pub credentials_key: Option<String>,
    pub log_format: String,
}

impl CliConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_url = std::env::var(portana_api::config::API_URL_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty());
        let credentials_file = std::env::var("PORTANA_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_FILE));
        let credentials_key = std::env::var("PORTANA_CREDENTIALS_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let log_format =
            std::env::var("PORTANA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        Self {
            api_url,
            credentials_file,
            credentials_key,
            log_format,
        }
    }

    /// Command-line flags win over the environment.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if api_url.is_some() {
            self.api_url = api_url;
        }
        self
    }
}
