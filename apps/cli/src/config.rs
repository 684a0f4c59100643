use goalpost_core::errors::Error;
use goalpost_storage_sqlite::get_db_path;

pub const DEFAULT_DB_PATH: &str = "./db/goalpost.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub sample_data: bool,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, Error> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(Error::ConfigIO(e.to_string()));
            }
        }
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.db_path = get_db_path(&config.db_path);
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("GOALPOST_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let sample_data = match lookup("GOALPOST_SAMPLE_DATA") {
            Some(raw) => parse_flag("GOALPOST_SAMPLE_DATA", &raw)?,
            None => false,
        };

        let log_format = match lookup("GOALPOST_LOG_FORMAT") {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("text") || raw.is_empty() => LogFormat::Text,
            Some(raw) => {
                return Err(Error::InvalidConfigValue(format!(
                    "GOALPOST_LOG_FORMAT must be `text` or `json`, got `{}`",
                    raw
                )))
            }
            None => LogFormat::Text,
        };

        Ok(Config {
            db_path,
            sample_data,
            log_format,
        })
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::InvalidConfigValue(format!(
            "{} must be a boolean, got `{}`",
            key, other
        ))),
    }
}
