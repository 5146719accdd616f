use serde::Deserialize;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `CREATIVE_STUDIO__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub rulebook: RulebookConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Upper bound on request bodies; image uploads arrive base64-encoded.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// The compliance rulebook. Immutable once loaded and injected into the
/// rule engine at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct RulebookConfig {
    #[serde(default = "default_banned_keywords")]
    pub banned_keywords: Vec<String>,
    /// Lower-case call-to-action phrases that count as strong.
    #[serde(default = "default_approved_ctas")]
    pub approved_ctas: Vec<String>,
    #[serde(default = "default_max_headline_chars")]
    pub max_headline_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_max_kb")]
    pub default_max_kb: u32,
    #[serde(default = "default_output_format")]
    pub default_format: String,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_banned_keywords() -> Vec<String> {
    ["discount", "save", "deal", "best", "£", "$", "%"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_approved_ctas() -> Vec<String> {
    ["shop today", "view offer", "buy online", "shop now"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_max_headline_chars() -> usize {
    30
}
fn default_max_kb() -> u32 {
    500
}
fn default_output_format() -> String {
    "jpeg".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for RulebookConfig {
    fn default() -> Self {
        Self {
            banned_keywords: default_banned_keywords(),
            approved_ctas: default_approved_ctas(),
            max_headline_chars: default_max_headline_chars(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            default_max_kb: default_max_kb(),
            default_format: default_output_format(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            rulebook: RulebookConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config/creative-studio.toml` (if present)
    /// and environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/creative-studio").required(false))
            .add_source(
                config::Environment::with_prefix("CREATIVE_STUDIO")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("rulebook.banned_keywords")
                    .with_list_parse_key("rulebook.approved_ctas"),
            );

        let config = builder.build()?;
        let loaded: Self = config.try_deserialize()?;
        tracing::debug!(
            banned_keywords = loaded.rulebook.banned_keywords.len(),
            approved_ctas = loaded.rulebook.approved_ctas.len(),
            "rulebook loaded"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rulebook() {
        let rulebook = RulebookConfig::default();
        assert_eq!(rulebook.banned_keywords.len(), 7);
        assert!(rulebook.banned_keywords.contains(&"£".to_string()));
        assert!(rulebook.approved_ctas.contains(&"shop now".to_string()));
        assert_eq!(rulebook.max_headline_chars, 30);
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api": {"http_port": 9000}, "optimizer": {}}"#).unwrap();
        assert_eq!(config.api.http_port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.node_id, "node-01");
        assert_eq!(config.optimizer.default_max_kb, 500);
        assert_eq!(config.optimizer.default_format, "jpeg");
        assert_eq!(config.rulebook.max_headline_chars, 30);
    }
}
