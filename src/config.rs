// Configuration: credentials and endpoints come from environment variables,
// optionally seeded from an env file.

use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/youtube/v3";
pub const DEFAULT_CHUNK_SIZE: u64 = 100 * 1024 * 1024;
/// Resumable upload chunks must be a multiple of this many bytes.
pub const CHUNK_GRANULARITY: u64 = 256 * 1024;

const ENV_FILE_NAME: &str = ".env";
const APP_DIR_NAME: &str = "tubeman";

/// Credentials and endpoints for the video platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub upload_base_url: String,
    pub chunk_size: u64,
}

impl Config {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let access_token = get("YOUTUBE_ACCESS_TOKEN");
        let api_key = get("YOUTUBE_API_KEY");
        if access_token.is_none() && api_key.is_none() {
            bail!("Set YOUTUBE_ACCESS_TOKEN or YOUTUBE_API_KEY to talk to the API");
        }

        let chunk_size = match get("YOUTUBE_UPLOAD_CHUNK_SIZE") {
            Some(raw) => {
                let size: u64 = raw
                    .parse()
                    .with_context(|| format!("Parsing YOUTUBE_UPLOAD_CHUNK_SIZE={raw}"))?;
                validate_chunk_size(size)?
            }
            None => DEFAULT_CHUNK_SIZE,
        };

        Ok(Config {
            access_token,
            api_key,
            api_base_url: get("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            upload_base_url: get("YOUTUBE_UPLOAD_BASE_URL")
                .unwrap_or_else(|| DEFAULT_UPLOAD_BASE_URL.to_string()),
            chunk_size,
        })
    }
}

fn validate_chunk_size(size: u64) -> Result<u64> {
    if size == 0 || size % CHUNK_GRANULARITY != 0 {
        bail!(
            "YOUTUBE_UPLOAD_CHUNK_SIZE must be a positive multiple of {} bytes, got {}",
            CHUNK_GRANULARITY,
            size
        );
    }
    Ok(size)
}

/// Picks the env file to load: an explicit path always wins, then `.env` in
/// `cwd`, then `tubeman/env` under the user config directory.
pub fn env_file_candidate(
    explicit: Option<&Path>,
    cwd: &Path,
    config_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = cwd.join(ENV_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    config_dir
        .map(|dir| dir.join(APP_DIR_NAME).join("env"))
        .filter(|path| path.is_file())
}

/// Loads the env file into the process environment without overriding
/// variables that are already set. Returns the file that was loaded.
pub fn load_env_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("Reading current directory")?;
    let config_dir = dirs::config_dir();
    let Some(path) = env_file_candidate(explicit, &cwd, config_dir.as_deref()) else {
        return Ok(None);
    };
    dotenvy::from_path(&path)
        .map_err(|err| anyhow!("Loading {}: {}", path.display(), err))?;
    Ok(Some(path))
}
