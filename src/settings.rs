use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_DATABASE, DEFAULT_DATA_DIR, DEFAULT_INSTANCE_DIR,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

pub const SETTINGS_FILE: &str = "station-loader";
pub const ENV_PREFIX: &str = "STATION_LOADER";

/// Runtime settings, layered from defaults, an optional `station-loader.toml`
/// and `STATION_LOADER_*` environment variables.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    pub instance_dir: PathBuf,

    #[validate(length(min = 1))]
    pub database: String,

    pub data_dir: PathBuf,

    #[validate(range(min = 1))]
    pub chunk_size: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    /// Load settings using `file` (extension optional) as the settings file.
    pub fn load_from(file: &Path) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("instance_dir", DEFAULT_INSTANCE_DIR)?
            .set_default("database", DEFAULT_DATABASE)?
            .set_default("data_dir", DEFAULT_DATA_DIR)?
            .set_default("chunk_size", DEFAULT_CHUNK_SIZE as u64)?
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Full path of the database file. Creates the instance directory if needed.
    pub fn database_path(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.instance_dir)?;
        Ok(self.instance_dir.join(&self.database))
    }
}
