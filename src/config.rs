use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{RetryPolicy, DEFAULT_BASE_URL};

/// A fixed `(offset, limit)` slice of the pokemon catalog for one release era
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationWindow {
    pub generation: u8,
    pub offset: u32,
    pub limit: u32,
}

impl GenerationWindow {
    pub const fn new(generation: u8, offset: u32, limit: u32) -> Self {
        Self {
            generation,
            offset,
            limit,
        }
    }
}

pub const GENERATION_WINDOWS: [GenerationWindow; 7] = [
    GenerationWindow::new(1, 0, 151),
    GenerationWindow::new(2, 151, 100),
    GenerationWindow::new(3, 251, 135),
    GenerationWindow::new(4, 386, 107),
    GenerationWindow::new(5, 493, 156),
    GenerationWindow::new(6, 649, 72),
    GenerationWindow::new(7, 721, 88),
];

/// Per-subject caps that bound row growth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub moves: usize,
    pub encounter_areas: usize,
    pub encounter_versions: usize,
    pub encounter_details: usize,
    pub pokedex_entries: usize,
    pub stats: usize,
    pub type_catalog: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            moves: 50,
            encounter_areas: 20,
            encounter_versions: 3,
            encounter_details: 2,
            pokedex_entries: 10,
            stats: 6,
            type_catalog: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database: PathBuf,
    pub base_url: String,
    pub windows: Vec<GenerationWindow>,
    pub limits: Limits,
    /// Pause after each subject to stay polite with the public API
    pub throttle: Duration,
    pub retry: RetryPolicy,
}

impl Settings {
    pub fn new(database: PathBuf) -> Self {
        Self {
            database,
            base_url: DEFAULT_BASE_URL.to_string(),
            windows: GENERATION_WINDOWS.to_vec(),
            limits: Limits::default(),
            throttle: Duration::from_millis(100),
            retry: RetryPolicy::default(),
        }
    }

    /// Build settings from the CLI/env connection string, falling back to the
    /// per-user data directory
    pub fn resolve(database: Option<String>, base_url: Option<String>) -> Result<Self> {
        let database = match database {
            Some(url) => database_path(&url),
            None => default_database_path()?,
        };

        let mut settings = Self::new(database);
        if let Some(base_url) = base_url {
            settings.base_url = base_url;
        }
        Ok(settings)
    }
}

/// Accept both bare paths and `sqlite:` / `file:` connection strings
pub fn database_path(url: &str) -> PathBuf {
    let trimmed = ["sqlite://", "sqlite:", "file:"]
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .unwrap_or(url);
    PathBuf::from(trimmed)
}

fn default_database_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "pokedex-seed")
        .context("Could not determine data directory")?;
    Ok(proj_dirs.data_dir().join("pokedex.db"))
}
