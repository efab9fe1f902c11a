use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path to the canonical dataset CSV file.
    pub path: String,
    /// Column holding the reception date of each record.
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,
    /// Column receiving the per-source tag on merged records.
    #[serde(default = "default_tag_column")]
    pub tag_column: String,
}

fn default_timestamp_column() -> String {
    "date_reception_dpe".to_string()
}

fn default_tag_column() -> String {
    "Logement".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Maximum records requested per source per refresh.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Request timeout per source, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Postal-code prefix bounding the search space (department number).
    #[serde(default = "default_region_prefix")]
    pub region_prefix: String,
    /// Remote field the region prefix filter applies to.
    #[serde(default = "default_region_field")]
    pub region_field: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            region_prefix: default_region_prefix(),
            region_field: default_region_field(),
        }
    }
}

fn default_page_size() -> usize {
    1200
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_region_prefix() -> String {
    "73".to_string()
}

fn default_region_field() -> String {
    "code_postal_ban".to_string()
}

/// One remote data-fair endpoint to pull new records from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Short name used in logs and error messages, e.g. "existants".
    pub label: String,
    /// Base URL of the dataset's `lines` endpoint.
    pub url: String,
    /// Value written into the tag column of every merged record.
    pub tag: String,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load(config_path: &str) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::File::with_name(config_path));

        // Add environment variables with prefix DPESYNC_
        // Example: DPESYNC_SERVER_PORT=8080
        builder = builder.add_source(
            config::Environment::with_prefix("DPESYNC")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.store.path.trim().is_empty() {
            anyhow::bail!("Store requires a non-empty 'path'");
        }
        if self.store.timestamp_column.trim().is_empty() {
            anyhow::bail!("Store requires a non-empty 'timestamp_column'");
        }

        if self.fetch.page_size == 0 {
            anyhow::bail!("Fetch 'page_size' must be greater than zero");
        }
        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("Fetch 'timeout_secs' must be greater than zero");
        }

        if self.sources.is_empty() {
            anyhow::bail!("At least one source must be configured");
        }
        for source in &self.sources {
            if source.label.trim().is_empty() {
                anyhow::bail!("Source requires a non-empty 'label'");
            }
            let url = url::Url::parse(&source.url)
                .with_context(|| format!("Invalid URL for source '{}'", source.label))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                anyhow::bail!(
                    "Source '{}' URL must be http or https, got '{}'",
                    source.label,
                    url.scheme()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            store: StoreConfig {
                path: "data/dpe_73.csv".to_string(),
                timestamp_column: default_timestamp_column(),
                tag_column: default_tag_column(),
            },
            fetch: FetchConfig::default(),
            sources: vec![SourceConfig {
                label: "existants".to_string(),
                url: "https://data.ademe.fr/data-fair/api/v1/datasets/dpe03existant/lines"
                    .to_string(),
                tag: "Ancien".to_string(),
            }],
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn empty_store_path_rejected() {
        let mut config = base_config();
        config.store.path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn no_sources_rejected() {
        let mut config = base_config();
        config.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_source_rejected() {
        let mut config = base_config();
        config.sources[0].url = "ftp://data.ademe.fr/lines".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_page_size_rejected() {
        let mut config = base_config();
        config.fetch.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn fetch_defaults_match_ademe_contract() {
        let fetch = FetchConfig::default();
        assert_eq!(fetch.page_size, 1200);
        assert_eq!(fetch.region_field, "code_postal_ban");
    }
}
