use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::llm::LLMProvider;
use crate::search::SearchMode;

/// Configuration for the shorts catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video-platform metadata API settings
    pub youtube: YouTubeConfig,

    /// Text-generation settings used for enrichment
    pub llm: LLMConfig,

    /// Enrichment batching and pacing
    pub enrichment: EnrichmentConfig,

    /// Catalog file locations
    pub catalog: CatalogConfig,

    /// Query service HTTP settings
    pub server: ServerConfig,

    /// Search behaviour
    pub search: SearchConfig,

    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// API key (usually supplied through `YOUTUBE_API_KEY`)
    pub api_key: Option<String>,

    /// Base URL of the Data API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Source channel ids
    pub channels: Vec<String>,
}

/// LLM configuration for enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM provider to use
    pub provider: LLMProvider,

    /// API endpoint override (OpenAI-compatible servers, proxies)
    pub endpoint: Option<String>,

    /// API key (usually supplied through `GEMINI_API_KEY`)
    pub api_key: Option<String>,

    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Prompt overrides
    pub prompts: PromptConfig,
}

/// Optional prompt files; missing files fall back to the built-in prompts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Base directory for prompt files
    pub prompt_dir: PathBuf,

    /// Categorization prompt file
    pub categorize_file: String,

    /// Keyword extraction prompt file
    pub keywords_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Videos per enrichment batch
    pub batch_size: usize,

    /// Upstream requests-per-minute ceiling (0 disables pacing)
    pub requests_per_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Post-filter, pre-enrichment catalog
    pub raw_path: PathBuf,

    /// Enriched catalog loaded by the query service
    pub enriched_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Mode used when a request does not name one
    pub default_mode: SearchMode,

    /// Records returned by sampling mode when no limit is given
    pub default_sample_size: usize,

    /// Ceiling on the records a sampling request may draw
    pub max_limit: usize,

    /// Reshuffle the catalog after every search
    pub shuffle_on_search: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's own events (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
}

/// Curated educational programming channels.
pub const DEFAULT_CHANNELS: [&str; 14] = [
    "UCCezIgC97PvUuR4_gbFUs5g", // Corey Schafer
    "UC29ju8bIPH5as8OGnQzwJyA", // Traversy Media
    "UCcabW7890RKJzL968QWEykA", // CS50
    "UC_x5XG1OV2P6uZZ5FSM9Ttw", // Khan Academy
    "UCWv7vMbMWH4-V0ZXdmDpPBA", // Programming with Mosh
    "UCFbNIlppjAuEX4znoulh0Cw", // Web Dev Simplified
    "UCW5YeuERMmlnqo4oq8vwUpg", // The Net Ninja
    "UCsBjURrPoezykLs9EqgamOA", // Fireship
    "UC8butISFwT-Wl7EV0hUK0BQ", // freeCodeCamp.org
    "UC4SVo0Ue36XCfOyb5Lh1viQ", // Bro Code
    "UCuudpdbKmQWq2PPzYgVCWlA", // Indently
    "UCaiL2GDNpLYH6Wokkk1VNcg", // mCoding
    "UCZgt6AzoyjslHTC9dz0UoTw", // ByteByteGo
    "UCzNf0liwUzMN6_pixbQlMhQ", // Coder Coder
];

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_seconds: 30,
            channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Gemini,
            endpoint: None,
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            max_tokens: 8192,
            temperature: 0.1, // Low temperature for consistent labels
            timeout_seconds: 60,
            prompts: PromptConfig::default(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            prompt_dir: PathBuf::from("config/prompts"),
            categorize_file: "categorize.txt".to_string(),
            keywords_file: "keywords.txt".to_string(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            requests_per_minute: 60,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("shorts_db.json"),
            enriched_path: PathBuf::from("categorized_db.json"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive for `tracing_subscriber::EnvFilter`
    pub fn filter_directive(&self, verbose: bool) -> String {
        let level = if verbose { "debug" } else { self.level.as_str() };
        format!("shorts_catalog={},warn", level)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_mode: SearchMode::Substring,
            default_sample_size: 10,
            max_limit: 100,
            shuffle_on_search: false,
        }
    }
}

impl PromptConfig {
    /// Load prompt content from a file in the prompt directory
    pub async fn load_prompt(&self, filename: &str) -> Result<String> {
        let path = self.prompt_dir.join(filename);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) => Err(anyhow!("Failed to load prompt from {}: {}", path.display(), e)),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, or the first default location found,
    /// then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_locations(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn from_default_locations() -> Self {
        let config_paths = [
            "shorts-catalog.toml",
            "config/shorts-catalog.toml",
            "/etc/shorts-catalog/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Self::default()
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read config file {}: {}", path.display(), e))?;
        let config = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Override settings from environment variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("YOUTUBE_API_KEY").filter(|v| !v.is_empty()) {
            self.youtube.api_key = Some(key);
        }

        if let Some(key) = lookup("GEMINI_API_KEY").filter(|v| !v.is_empty()) {
            self.llm.api_key = Some(key);
        }

        if let Some(path) = lookup("SHORTS_CATALOG_RAW_PATH") {
            self.catalog.raw_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("SHORTS_CATALOG_ENRICHED_PATH") {
            self.catalog.enriched_path = PathBuf::from(path);
        }

        if let Some(port) = lookup("SHORTS_CATALOG_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(level) = lookup("SHORTS_CATALOG_LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.logging.level = level.to_lowercase();
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Settings the harvesting and filtering stages need
    pub fn validate_for_build(&self) -> Result<()> {
        if self.youtube.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(anyhow!("YouTube API key required (set YOUTUBE_API_KEY)"));
        }

        if self.youtube.timeout_seconds == 0 {
            return Err(anyhow!("youtube.timeout_seconds must be greater than 0"));
        }

        Ok(())
    }

    /// Settings the enrichment stage needs
    pub fn validate_for_enrich(&self) -> Result<()> {
        if self.enrichment.batch_size == 0 {
            return Err(anyhow!("enrichment.batch_size must be greater than 0"));
        }

        match self.llm.provider {
            LLMProvider::Gemini | LLMProvider::OpenAI => {
                if self.llm.api_key.as_deref().map_or(true, str::is_empty) {
                    return Err(anyhow!("API key required for {:?} provider", self.llm.provider));
                }
            }
            LLMProvider::LMStudio => {
                if self.llm.endpoint.is_none() {
                    return Err(anyhow!("endpoint required for LMStudio provider"));
                }
            }
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Shorts Catalog Configuration:\n\
            - Channels: {}\n\
            - LLM Provider: {:?} ({})\n\
            - Enrichment Batch Size: {}\n\
            - Requests Per Minute: {}\n\
            - Raw Catalog: {}\n\
            - Enriched Catalog: {}\n\
            - Server: {}:{}",
            self.youtube.channels.len(),
            self.llm.provider,
            self.llm.model,
            self.enrichment.batch_size,
            self.enrichment.requests_per_minute,
            self.catalog.raw_path.display(),
            self.catalog.enriched_path.display(),
            self.server.host,
            self.server.port,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_channels(mut self, channels: Vec<String>) -> Self {
        self.config.youtube.channels = channels;
        self
    }

    pub fn with_youtube_api_key(mut self, api_key: String) -> Self {
        self.config.youtube.api_key = Some(api_key);
        self
    }

    pub fn with_llm_api_key(mut self, api_key: String) -> Self {
        self.config.llm.api_key = Some(api_key);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.enrichment.batch_size = batch_size;
        self
    }

    pub fn with_requests_per_minute(mut self, rpm: u32) -> Self {
        self.config.enrichment.requests_per_minute = rpm;
        self
    }

    pub fn with_catalog_paths(mut self, raw_path: PathBuf, enriched_path: PathBuf) -> Self {
        self.config.catalog.raw_path = raw_path;
        self.config.catalog.enriched_path = enriched_path;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
