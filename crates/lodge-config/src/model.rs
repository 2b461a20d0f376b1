use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Largest offset chrono accepts, in minutes (exclusive bound of +/-24h).
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Stores property-level settings and where the ledger keeps its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_property_name")]
    pub property_name: String,
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_invoice_prefix")]
    pub invoice_prefix: String,
    /// Minutes east of UTC in which days, months and invoice timestamps are observed.
    #[serde(default = "Config::default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default = "Config::default_recent_stays_limit")]
    pub recent_stays_limit: usize,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for collection files. Defaults to `~/Documents/Lodge`.
    pub data_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `~/Documents/Lodge/backups`.
    pub backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            property_name: Self::default_property_name(),
            locale: "en-IN".into(),
            currency: "INR".into(),
            invoice_prefix: Self::default_invoice_prefix(),
            utc_offset_minutes: Self::default_utc_offset_minutes(),
            recent_stays_limit: Self::default_recent_stays_limit(),
            backup_retention: Self::default_backup_retention(),
            data_root: None,
            backup_root: None,
        }
    }
}

impl Config {
    pub fn default_property_name() -> String {
        "Gulmohar Resort".into()
    }

    pub fn default_invoice_prefix() -> String {
        "GR".into()
    }

    pub fn default_utc_offset_minutes() -> i32 {
        330
    }

    pub fn default_recent_stays_limit() -> usize {
        5
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        if self.utc_offset_minutes.abs() >= MAX_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_minutes {} is out of range",
                self.utc_offset_minutes
            )));
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "utc_offset_minutes {} is out of range",
                self.utc_offset_minutes
            ))
        })
    }

    /// Checks the settings that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.utc_offset()?;
        if self.invoice_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("invoice_prefix must not be blank".into()));
        }
        if self.backup_retention == 0 {
            return Err(ConfigError::Invalid("backup_retention must be at least 1".into()));
        }
        Ok(())
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }
        default_base().join("Lodge")
    }

    pub fn resolve_backup_root(&self) -> PathBuf {
        if let Some(path) = &self.backup_root {
            return path.clone();
        }
        default_base().join("Lodge").join("backups")
    }
}

fn default_base() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
