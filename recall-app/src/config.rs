use crate::cli::opts::Cli;
use recall_json::paths::default_store_file;
use std::path::PathBuf;

pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Where the store lives, after flags, environment, and defaults are merged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub backups_dir: PathBuf,
    pub max_backups: usize,
}

impl AppConfig {
    pub fn resolve(cli: &Cli) -> Self {
        let (default_file, default_backups) = default_store_file();
        let data_file = cli.data_file.clone().unwrap_or(default_file);
        let backups_dir = match (&cli.backups_dir, &cli.data_file) {
            (Some(dir), _) => dir.clone(),
            // keep backups beside an explicitly chosen store file
            (None, Some(file)) => file
                .parent()
                .map(|p| p.join("backups"))
                .unwrap_or(default_backups),
            (None, None) => default_backups,
        };
        Self {
            data_file,
            backups_dir,
            max_backups: cli.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS).max(1),
        }
    }
}
