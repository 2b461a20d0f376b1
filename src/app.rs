//! Bootstrap that opens the JSON-backed ledger and expenditure book from a [`Config`].

use std::sync::Arc;

use tracing::info;

use lodge_config::{Config, ConfigError, ConfigManager};
use lodge_core::{Clock, ExpenditureBook, LedgerSettings, StayLedger, SystemClock};
use lodge_domain::{Expenditure, Stay};
use lodge_storage_json::{BackupInfo, JsonRecordStore, StoragePaths};

use crate::LodgeError;

/// Translates property settings into the ledger's runtime settings.
pub fn settings_from_config(config: &Config) -> Result<LedgerSettings, ConfigError> {
    config.validate()?;
    Ok(LedgerSettings {
        invoice_prefix: config.invoice_prefix.trim().to_string(),
        utc_offset: config.utc_offset()?,
        recent_stays_limit: config.recent_stays_limit,
    })
}

/// An opened lodge: configuration, stay ledger and expenditure book over JSON files.
pub struct Lodge {
    config: Config,
    stays: Arc<JsonRecordStore<Stay>>,
    expenses: Arc<JsonRecordStore<Expenditure>>,
    ledger: StayLedger,
    expenditures: ExpenditureBook,
}

impl Lodge {
    pub fn open(config: Config) -> Result<Self, LodgeError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Loads the saved configuration (or defaults) and opens the lodge it describes.
    pub fn from_manager(manager: &ConfigManager) -> Result<Self, LodgeError> {
        Self::open(manager.load()?)
    }

    pub fn open_with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self, LodgeError> {
        let settings = settings_from_config(&config)?;
        let offset = settings.utc_offset;
        let paths = StoragePaths {
            data_root: config.resolve_data_root(),
            backup_root: config.resolve_backup_root(),
        };

        let stays = Arc::new(JsonRecordStore::<Stay>::with_retention(
            paths.clone(),
            config.backup_retention,
        )?);
        let expenses = Arc::new(JsonRecordStore::<Expenditure>::with_retention(
            paths.clone(),
            config.backup_retention,
        )?);

        let ledger = StayLedger::new(stays.clone(), clock.clone(), settings);
        let expenditures = ExpenditureBook::new(expenses.clone(), clock, offset);
        info!(
            property = %config.property_name,
            data_root = %paths.data_root.display(),
            "lodge opened"
        );
        Ok(Self {
            config,
            stays,
            expenses,
            ledger,
            expenditures,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &StayLedger {
        &self.ledger
    }

    pub fn expenditures(&self) -> &ExpenditureBook {
        &self.expenditures
    }

    /// Snapshots both collections under the same note.
    pub fn backup(&self, note: Option<&str>) -> Result<Vec<BackupInfo>, LodgeError> {
        Ok(vec![self.stays.backup(note)?, self.expenses.backup(note)?])
    }

    pub fn stay_backups(&self) -> Result<Vec<BackupInfo>, LodgeError> {
        Ok(self.stays.list_backups()?)
    }

    pub fn expenditure_backups(&self) -> Result<Vec<BackupInfo>, LodgeError> {
        Ok(self.expenses.list_backups()?)
    }

    /// Replaces the stay collection with a backup; returns the number of restored stays.
    pub fn restore_stays(&self, backup: &BackupInfo) -> Result<usize, LodgeError> {
        Ok(self.stays.restore_backup(backup)?.len())
    }

    pub fn restore_expenditures(&self, backup: &BackupInfo) -> Result<usize, LodgeError> {
        Ok(self.expenses.restore_backup(backup)?.len())
    }
}
