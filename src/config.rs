use crate::location::ProviderSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const CONFIG_PATH: &str = "config.toml";

/// Every section and field is optional in the file; whatever is left out
/// takes its default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub search: SearchConfig,
    pub store: StoreConfig,
    pub ui: UiConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    pub max_retries: u32,     // Full provider sweeps before giving up
    pub backoff_base_ms: u64, // Wait is base * attempt number
    pub providers: Vec<ProviderSpec>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub dataset_path: String,
    pub suburb_radius_km: f64, // Cutoff for suburb picks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_radius_km: Option<f64>, // Cutoff for the IP lookup; none by default
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub db_path: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub default_view: String, // "Nearby", "Suburbs" or "Search"
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 500,
            providers: ProviderSpec::defaults(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/salons.json".to_string(),
            suburb_radius_km: 200.0,
            nearby_radius_km: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: "salon_selection.db".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_view: "Nearby".to_string(),
        }
    }
}

impl Config {
    /// Loads config.toml from the working directory.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Loads the config at `path`.
    /// If it doesn't exist, writes the defaults there and uses them.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    return Self::default();
                }
            }
        }

        let default_config = Self::default();

        // Save default config to disk for the user to edit later
        match toml::to_string_pretty(&default_config) {
            Ok(toml_string) => {
                if fs::write(path, toml_string).is_err() {
                    warn!("Could not write default {} to disk.", path.display());
                }
            }
            Err(e) => warn!("Could not serialize default config: {}", e),
        }

        info!("Loaded default configuration.");
        default_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::ProviderKind;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("salon-finder-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn missing_file_writes_defaults() {
        let path = scratch_path("missing.toml");
        let _ = fs::remove_file(&path);

        let config = Config::load_from(&path);
        assert_eq!(config, Config::default());

        let reloaded = Config::load_from(&path);
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.resolver.providers[0].kind, ProviderKind::Proxy);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let path = scratch_path("broken.toml");
        fs::write(&path, "resolver = [not valid").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn partial_file_keeps_what_it_sets() {
        let path = scratch_path("partial.toml");
        fs::write(&path, "[resolver]\nmax_retries = 7\n").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.resolver.max_retries, 7);
        assert_eq!(config.resolver.backoff_base_ms, 500);
        assert_eq!(config.resolver.providers, ProviderSpec::defaults());
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.ui.default_view, "Nearby");
    }

    #[test]
    fn custom_provider_order_is_kept() {
        let path = scratch_path("custom.toml");
        fs::write(
            &path,
            r#"
[resolver]
max_retries = 5
backoff_base_ms = 100

[[resolver.providers]]
name = "ip-api.com"
url = "http://ip-api.com/json/"
timeout_ms = 1500
kind = "ip_api_com"

[[resolver.providers]]
name = "proxy"
url = "https://salons.example/.netlify/functions/whoami"
timeout_ms = 2000
kind = "proxy"

[search]
dataset_path = "salons.csv"
suburb_radius_km = 150.0
nearby_radius_km = 80.0

[store]
db_path = "sel.db"

[ui]
default_view = "Suburbs"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.resolver.max_retries, 5);
        assert_eq!(config.resolver.providers.len(), 2);
        assert_eq!(config.resolver.providers[0].name, "ip-api.com");
        assert_eq!(config.search.nearby_radius_km, Some(80.0));
    }
}
