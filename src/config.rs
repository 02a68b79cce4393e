use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::path::Path;

use crate::models::{RadiusPolicy, DEFAULT_RADIUS_KM, FALLBACK_RADIUS_KM};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_properties_table")]
    pub properties_table: String,
    #[serde(default = "default_preferences_table")]
    pub preferences_table: String,
    #[serde(default = "default_image_bucket")]
    pub image_bucket: String,
    pub timeout_secs: Option<u64>,
}

fn default_properties_table() -> String { "properties".to_string() }
fn default_preferences_table() -> String { "tenant_preferences".to_string() }
fn default_image_bucket() -> String { "property-images".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_entries(),
        }
    }
}

fn default_cache_ttl() -> u64 { 60 }
fn default_cache_entries() -> u64 { 16 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default = "default_fallback_radii")]
    pub fallback_radii_km: Vec<f64>,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            fallback_radii_km: default_fallback_radii(),
            max_limit: default_max_limit(),
        }
    }
}

impl MatchingSettings {
    /// Build the selector's widening chain from configuration
    pub fn radius_policy(&self) -> RadiusPolicy {
        RadiusPolicy {
            default_radius_km: self.default_radius_km,
            fallback_radii_km: self.fallback_radii_km.clone(),
        }
    }

    /// Clamp an explicit result limit; no limit means the full ranked list
    pub fn effective_limit(&self, requested: Option<u16>) -> Option<usize> {
        requested.map(|limit| limit.min(self.max_limit) as usize)
    }
}

fn default_radius_km() -> f64 { DEFAULT_RADIUS_KM }
fn default_fallback_radii() -> Vec<f64> { vec![FALLBACK_RADIUS_KM] }
fn default_max_limit() -> u16 { 200 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RENTAL__)
    /// 5. BACKEND_URL / BACKEND_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let files = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        Self::from_layers(files, None)
    }

    /// Load configuration from a custom path, with the same environment layer
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let files = Config::builder().add_source(File::from(path.as_ref()));

        Self::from_layers(files, None)
    }

    /// Stack the environment on top of `files`. `vars` replaces the process
    /// environment when given.
    fn from_layers(
        files: ConfigBuilder<DefaultState>,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings = files.add_source(environment(vars.clone())).build()?;

        let lookup = |key: &str| match &vars {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        let settings = apply_backend_overrides(settings, lookup)?;

        settings.try_deserialize()
    }
}

// e.g., RENTAL__SERVER__PORT -> server.port
fn environment(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix("RENTAL")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("matching.fallback_radii_km")
        .try_parsing(true)
        .source(vars)
}

/// Let the conventional BACKEND_URL / BACKEND_API_KEY variables win over files
fn apply_backend_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = lookup("BACKEND_URL") {
        builder = builder.set_override("backend.url", url)?;
    }
    if let Some(api_key) = lookup("BACKEND_API_KEY") {
        builder = builder.set_override("backend.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.default_radius_km, 3.0);
        assert_eq!(matching.fallback_radii_km, vec![5.0]);
        assert_eq!(matching.radius_policy(), RadiusPolicy::default());
    }

    #[test]
    fn test_effective_limit() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.effective_limit(None), None);
        assert_eq!(matching.effective_limit(Some(10)), Some(10));
        assert_eq!(matching.effective_limit(Some(5000)), Some(200));
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    fn write_config() -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("rental-match-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[backend]
url = "https://backend.test"
api_key = "key"

[matching]
default_radius_km = 2.0
fallback_radii_km = [4.0, 10.0]
"#
        )
        .unwrap();
        path
    }

    #[test]
    fn test_load_from_file() {
        let path = write_config();
        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.backend.properties_table, "properties");
        assert_eq!(settings.cache.ttl_secs, 60);
        assert_eq!(
            settings.matching.radius_policy(),
            RadiusPolicy {
                default_radius_km: 2.0,
                fallback_radii_km: vec![4.0, 10.0],
            }
        );
    }

    #[test]
    fn test_environment_layer_over_file() {
        let path = write_config();
        let mut vars = Map::new();
        vars.insert("RENTAL__MATCHING__FALLBACK_RADII_KM".to_string(), "6,9.5".to_string());
        vars.insert("RENTAL__SERVER__PORT".to_string(), "9100".to_string());
        vars.insert("BACKEND_URL".to_string(), "https://override.test".to_string());
        vars.insert("BACKEND_API_KEY".to_string(), "override-key".to_string());

        let files = Config::builder().add_source(File::from(path.as_path()));
        let settings = Settings::from_layers(files, Some(vars)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.backend.url, "https://override.test");
        assert_eq!(settings.backend.api_key, "override-key");
        assert_eq!(settings.matching.default_radius_km, 2.0);
        assert_eq!(settings.matching.fallback_radii_km, vec![6.0, 9.5]);
    }
}
