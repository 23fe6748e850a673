use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default directory (relative to the working directory) images are saved into.
pub const DEFAULT_OUTPUT_DIR: &str = "Fetched_Images";

/// Connect and stall timeout for each request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Receive buffer bounds accepted by libcurl (`CURLOPT_BUFFERSIZE`); older libcurl caps
/// at 512 KiB, so that is the upper bound here.
pub const MIN_CHUNK_SIZE: usize = 1024;
pub const MAX_CHUNK_SIZE: usize = 512 * 1024;

/// Global configuration loaded from `~/.config/imgfetch/config.toml`.
///
/// The size cap (`media::MAX_FILE_SIZE`) and [`REQUEST_TIMEOUT`] are fixed and not read
/// from the file; stale keys for them in older files are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Directory fetched images are written to.
    pub output_dir: PathBuf,
    /// `User-Agent` sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Receive buffer size handed to the HTTP client, in bytes. Clamped by [`Self::buffer_size`].
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_user_agent() -> String {
    format!(
        "imgfetch/{} (respectful image fetcher)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_chunk_size() -> usize {
    8192
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: default_user_agent(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl FetchConfig {
    /// `chunk_size` clamped to what libcurl accepts.
    pub fn buffer_size(&self) -> usize {
        let clamped = self.chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE);
        if clamped != self.chunk_size {
            tracing::warn!(
                requested = self.chunk_size,
                used = clamped,
                "chunk_size out of range, clamped"
            );
        }
        clamped
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
