//! `imgfetch config` – show where the config lives and what is in effect.

use anyhow::Result;
use imgfetch_core::config::{self, FetchConfig, REQUEST_TIMEOUT};
use imgfetch_core::media::MAX_FILE_SIZE;

pub fn run_config(cfg: &FetchConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    println!("output_dir = {}", cfg.output_dir.display());
    println!("user_agent = {}", cfg.user_agent);
    println!("chunk_size = {}", cfg.buffer_size());
    println!("max file size: {} bytes (fixed)", MAX_FILE_SIZE);
    println!("request timeout: {}s (fixed)", REQUEST_TIMEOUT.as_secs());
    Ok(())
}
