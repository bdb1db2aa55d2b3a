use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, StatsError};

/// Column positions in the IUCR reference table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReferenceLayout {
    pub code: usize,
    pub crime: usize,
    pub violent: usize,
    pub murder: usize,
}

impl Default for ReferenceLayout {
    fn default() -> Self {
        Self {
            code: 0,
            crime: 4,
            violent: 5,
            murder: 6,
        }
    }
}

impl ReferenceLayout {
    pub fn min_width(&self) -> usize {
        [self.code, self.crime, self.violent, self.murder]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Column positions in the crime ledger.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LedgerLayout {
    pub date: usize,
    pub code: usize,
}

impl Default for LedgerLayout {
    fn default() -> Self {
        Self { date: 2, code: 4 }
    }
}

impl LedgerLayout {
    pub fn min_width(&self) -> usize {
        self.date.max(self.code) + 1
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub reference: ReferenceLayout,
    #[serde(default)]
    pub ledger: LedgerLayout,
    #[serde(default = "default_progress_batch")]
    pub progress_batch: usize,
    /// Pad ledger codes to four characters before lookup.
    #[serde(default = "default_true")]
    pub normalize_ledger_codes: bool,
    /// Record the zero-time month `0001-01` for rows whose date fails to parse.
    #[serde(default)]
    pub track_unparsed_months: bool,
}

fn default_progress_batch() -> usize {
    100_000
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference: ReferenceLayout::default(),
            ledger: LedgerLayout::default(),
            progress_batch: default_progress_batch(),
            normalize_ledger_codes: true,
            track_unparsed_months: false,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("crimestats")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Result<Settings> {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| StatsError::io(path, e))?;
    let settings: Settings = serde_json::from_str(&content)
        .map_err(|e| StatsError::Settings(format!("{}: {e}", path.display())))?;
    if settings.progress_batch == 0 {
        return Err(StatsError::Settings(format!(
            "{}: progress_batch must be greater than zero",
            path.display()
        )));
    }
    Ok(settings)
}
