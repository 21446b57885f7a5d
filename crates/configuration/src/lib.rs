use crate::error::ConfigError;
use crate::settings::Settings;
use std::collections::HashMap;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LoggingSettings, ServerOverrides, ServerSettings};

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "DIGIMON";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning: built-in defaults, the TOML file
/// (`config.toml` unless `path` is given; optional only when defaulted),
/// `DIGIMON__SECTION__KEY` environment variables and finally `DATABASE_URL`.
/// Call `dotenvy::dotenv()` beforehand if a `.env` file should be honoured.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let database_url = std::env::var("DATABASE_URL").ok();
    build_settings(path, None, database_url)
}

/// The layering behind [`load_settings`], with the process environment made explicit.
fn build_settings(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
    database_url: Option<String>,
) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.cors_origins", Vec::<String>::new())?
        .set_default("database.url", "")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("logging.level", "info")?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .source(env),
        )
        .set_override_option("database.url", database_url)?
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
