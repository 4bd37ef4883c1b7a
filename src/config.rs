use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

/// Which record store backs the donation and NGO collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firestore,
    Sheets,
    Memory,
    #[default]
    Sample,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    pub firestore: Option<FirestoreSettings>,
    pub sheets: Option<SheetsSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreSettings {
    #[serde(default = "default_firestore_endpoint")]
    pub endpoint: String,
    pub project_id: String,
    #[serde(default = "default_firestore_database")]
    pub database_id: String,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_firestore_endpoint() -> String { "https://firestore.googleapis.com/v1".to_string() }
fn default_firestore_database() -> String { "(default)".to_string() }
fn default_page_size() -> u32 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsSettings {
    #[serde(default = "default_sheets_endpoint")]
    pub endpoint: String,
    pub spreadsheet_id: String,
    pub access_token: String,
    #[serde(default = "default_donors_sheet")]
    pub donors_sheet: String,
    #[serde(default = "default_ngos_sheet")]
    pub ngos_sheet: String,
}

fn default_sheets_endpoint() -> String { "https://sheets.googleapis.com".to_string() }
fn default_donors_sheet() -> String { "Donors".to_string() }
fn default_ngos_sheet() -> String { "NGOs".to_string() }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    #[default]
    Nominatim,
    Fixed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default)]
    pub provider: GeocoderProvider,
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
    /// Extra gazetteer entries for the fixed provider, as `[latitude, longitude]`
    #[serde(default)]
    pub places: HashMap<String, [f64; 2]>,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::default(),
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
            places: HashMap::new(),
        }
    }
}

fn default_geocoder_endpoint() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { "food_match_service".to_string() }
fn default_geocoder_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    /// Sort NGOs by id before matching so ties do not depend on store order
    #[serde(default)]
    pub sort_ngos_by_id: bool,
}

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
    /// 4. Environment variables (prefixed with FOODMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FOODMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FOODMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FOODMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the well-known credential variables on top of the layered config
///
/// Token and spreadsheet overrides only touch sections that are already
/// configured, so a stray variable cannot produce a half-filled section.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let has_firestore = settings.get::<config::Value>("store.firestore").is_ok();
    let has_sheets = settings.get::<config::Value>("store.sheets").is_ok();

    let mut builder = Config::builder().add_source(settings);

    if let Ok(project_id) = env::var("FIRESTORE_PROJECT_ID") {
        builder = builder.set_override("store.firestore.project_id", project_id)?;
    }
    if let Ok(token) = env::var("GOOGLE_ACCESS_TOKEN") {
        if has_firestore {
            builder = builder.set_override("store.firestore.access_token", token.clone())?;
        }
        if has_sheets {
            builder = builder.set_override("store.sheets.access_token", token)?;
        }
    }
    if let Ok(spreadsheet_id) = env::var("SHEETS_SPREADSHEET_ID") {
        if has_sheets {
            builder = builder.set_override("store.sheets.spreadsheet_id", spreadsheet_id)?;
        }
    }

    builder.build()
}
