//! Runtime configuration assembled from the command line

use std::path::PathBuf;

use clap::Args;

use crate::api::API_BASE;
use crate::catalog::Region;
use crate::session::DEFAULT_PAGE_SIZE;

pub const LOG_FILE: &str = "dexbrowser.log";

/// Browser options, flattened into the binary's argument parser.
#[derive(Args, Clone, Debug, PartialEq)]
pub struct Config {
    /// Region to open on start
    #[arg(long, value_enum, default_value_t = Region::Kanto)]
    pub region: Region,

    /// Records fetched per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Base URL of the PokeAPI-compatible REST service
    #[arg(long, default_value = API_BASE)]
    pub api_base: String,

    /// Log file path (the terminal is owned by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::Kanto,
            page_size: DEFAULT_PAGE_SIZE,
            api_base: API_BASE.to_string(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE))
    }
}

fn parse_page_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    let max = Region::ALL
        .iter()
        .map(|region| region.bounds().len())
        .max()
        .unwrap_or(1);
    if size == 0 || size > max {
        return Err(format!("page size must be between 1 and {max}"));
    }
    Ok(size)
}
