use config::{Config, Environment, File};
use serde::Deserialize;

use crate::codec::Format;
use crate::error::Result;

pub const ENV_PREFIX: &str = "SEARCHDOC";
pub const DEFAULT_FILE: &str = "searchdoc";

/// Runtime settings: built-in defaults, then an optional file
/// (`searchdoc.toml`, `.json` or `.yaml`), then `SEARCHDOC_*` variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub format: Format,
    pub pretty: bool,
    #[serde(default)]
    pub max_document_bytes: Option<usize>,
    /// An `EnvFilter` directive such as `info` or `searchdoc=debug`.
    pub log: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: Format::Json,
            pretty: false,
            max_document_bytes: None,
            log: String::from("info"),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_FILE)
    }

    /// `path` may omit its extension; a missing file is not an error.
    pub fn load_from(path: &str) -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("format", defaults.format.to_string())?
            .set_default("pretty", defaults.pretty)?
            .set_default("log", defaults.log)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
