use crate::core::{Result, StudentError};
use crate::validation::ValidationConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding `[database].path`.
pub const DB_PATH_ENV: &str = "STUDENT_DB_PATH";
/// Environment variable overriding `[validation].strict_cpf`.
pub const STRICT_CPF_ENV: &str = "VALIDATE_CPF_STRICTLY";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// On-disk shape of the TOML configuration file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    database: Option<DatabaseSection>,
    validation: Option<ValidationSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<PathBuf>,
    busy_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ValidationSection {
    strict_cpf: Option<bool>,
}

/// Resolved configuration, read once at startup and passed to constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub validation: ValidationConfig,
}

/// Where the student database lives and how long to wait on a locked file.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        DatabaseConfig {
            path: path.into(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

/// Values taken from the process environment that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_path: Option<String>,
    pub strict_cpf: Option<String>,
}

impl Overrides {
    /// Reads `STUDENT_DB_PATH` and `VALIDATE_CPF_STRICTLY`.
    pub fn from_env() -> Self {
        Overrides {
            db_path: std::env::var(DB_PATH_ENV).ok(),
            strict_cpf: std::env::var(STRICT_CPF_ENV).ok(),
        }
    }
}

impl AppConfig {
    /// Parses TOML content and applies the overrides.
    ///
    /// A database path is mandatory once overrides are applied; its absence is
    /// a startup-time `StudentError::Config`.
    pub fn from_toml_str(content: &str, overrides: &Overrides) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| StudentError::Config(e.to_string()))?;
        let database = file.database.unwrap_or_default();
        let validation = file.validation.unwrap_or_default();

        let path = match overrides.db_path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => database.path,
        };
        let path = path.ok_or_else(|| {
            StudentError::Config(format!(
                "no database path configured; set [database].path or {}",
                DB_PATH_ENV
            ))
        })?;

        // Anything other than "true" disables the check-digit verification.
        let strict_cpf = match overrides.strict_cpf.as_deref() {
            Some(raw) => raw.trim().eq_ignore_ascii_case("true"),
            None => validation.strict_cpf.unwrap_or(true),
        };
        if !strict_cpf {
            warn!("CPF check-digit validation is DISABLED ({}=false)", STRICT_CPF_ENV);
        }

        let config = AppConfig {
            database: DatabaseConfig {
                path,
                busy_timeout: Duration::from_millis(
                    database.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
                ),
            },
            validation: ValidationConfig { strict_cpf },
        };
        info!(
            "Database configuration: path={:?}, strict_cpf={}",
            config.database.path, config.validation.strict_cpf
        );
        Ok(config)
    }
}

/// Default configuration file location: `<config_dir>/student-registry/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("student-registry").join("config.toml"))
}

/// Loads configuration from a TOML file at the given path, then applies the
/// environment overrides.
///
/// # Example
///
/// ```no_run
/// let config = student_registry::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        StudentError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
    })?;
    AppConfig::from_toml_str(&content, &Overrides::from_env())
}

/// Loads the explicit file if given, otherwise the default file when it
/// exists, otherwise relies on the environment alone.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(path),
        _ => {
            warn!("No configuration file found. Using environment variables only.");
            AppConfig::from_toml_str("", &Overrides::from_env())
        }
    }
}
