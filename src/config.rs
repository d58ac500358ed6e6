use std::env;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "SHOPFRONT_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "shopfront-data";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the file-backed store keeps its JSON files in.
    pub data_dir: PathBuf,
}

impl Config {
    /// Reads `SHOPFRONT_DATA_DIR`, falling back to `shopfront-data` in the
    /// working directory.
    pub fn from_env() -> Self {
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        Self { data_dir }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
