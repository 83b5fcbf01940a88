use chrono::{DateTime, Utc};
use recall_core::{CoreError, Deck, DeckId, Persistence, StoreImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub mod paths;

const FILE_VERSION: u32 = 1;
const BACKUP_PREFIX: &str = "recall-";

#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    decks: Vec<Deck>,
    #[serde(default)]
    current_deck_id: Option<DeckId>,
}

impl FileImage {
    fn empty(now: DateTime<Utc>) -> Self {
        Self {
            version: FILE_VERSION,
            created_at: now,
            updated_at: now,
            decks: Vec::new(),
            current_deck_id: None,
        }
    }
}

/// Deck data in a single JSON file. Every save replaces the file atomically
/// and leaves a timestamped copy in the backups directory.
pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    created_at: DateTime<Utc>,
}

impl JsonStore {
    pub fn open_default() -> Result<Self, CoreError> {
        let (file, backups) = paths::default_store_file();
        Self::open_with(file, backups, 10)
    }

    pub fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
    ) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let max_backups = max_backups.max(1);

        let created_at = if path.exists() {
            read_image(&path)?.created_at
        } else {
            let img = FileImage::empty(Utc::now());
            write_with_backup(&path, &backups_dir, max_backups, &img)?;
            debug!(path = %path.display(), "initialised empty store file");
            img.created_at
        };

        Ok(Self {
            path,
            backups_dir,
            max_backups,
            created_at,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }
}

impl Persistence for JsonStore {
    fn load(&self) -> Result<StoreImage, CoreError> {
        let img = read_image(&self.path)?;
        Ok(StoreImage {
            decks: img.decks,
            current_deck_id: img.current_deck_id,
        })
    }

    fn save(&self, image: &StoreImage) -> Result<(), CoreError> {
        let img = FileImage {
            version: FILE_VERSION,
            created_at: self.created_at,
            updated_at: Utc::now(),
            decks: image.decks.clone(),
            current_deck_id: image.current_deck_id,
        };
        write_with_backup(&self.path, &self.backups_dir, self.max_backups, &img)
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

fn read_image(path: &Path) -> Result<FileImage, CoreError> {
    let buf = fs::read_to_string(path).map_err(|_| CoreError::Storage("io"))?;
    let img: FileImage =
        serde_json::from_str(&buf).map_err(|_| CoreError::Storage("malformed store file"))?;
    if img.version != FILE_VERSION {
        return Err(CoreError::Storage("unsupported store version"));
    }
    Ok(img)
}

fn write_with_backup(
    path: &Path,
    backups_dir: &Path,
    max_backups: usize,
    img: &FileImage,
) -> Result<(), CoreError> {
    let json = serde_json::to_vec_pretty(img).map_err(|_| CoreError::Storage("serialize"))?;

    write_atomic(path, &json).map_err(|err| {
        warn!(path = %path.display(), error = %err, "store write failed");
        CoreError::Storage("io")
    })?;

    let backup_path = backups_dir.join(backup_name(Utc::now()));
    write_atomic(&backup_path, &json).map_err(|_| CoreError::Storage("backup"))?;
    rotate_backups(backups_dir, max_backups).map_err(|_| CoreError::Storage("backup"))?;

    debug!(path = %path.display(), decks = img.decks.len(), "store saved");
    Ok(())
}

/// UTC so name order stays age order across offset changes.
fn backup_name(at: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}.json", at.format("%Y%m%d-%H%M%S%3f"))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Keeps the newest `keep` backups. Names embed the timestamp, so name order
/// is age order.
fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension().and_then(|s| s.to_str()) == Some("json")
                && p.file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(|n| n.starts_with(BACKUP_PREFIX))
        })
        .collect();
    backups.sort();
    if backups.len() > keep {
        let stale = backups.len() - keep;
        for p in &backups[..stale] {
            let _ = fs::remove_file(p);
        }
        debug!(removed = stale, "rotated backups");
    }
    Ok(())
}
