use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use lodge_config::Config;
use lodge_core::FixedClock;
use lodge_ledger::Lodge;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// 2024-06-15 10:00 at +05:30.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 4, 30, 0).unwrap()
}

/// Config whose data and backup roots live in a fresh temporary directory.
pub fn isolated_config() -> Config {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    Config {
        data_root: Some(base.join("data")),
        backup_root: Some(base.join("backups")),
        backup_retention: 10,
        ..Config::default()
    }
}

/// Opens a lodge over `config` with the clock frozen at [`reference_now`].
pub fn open_lodge(config: Config) -> Lodge {
    Lodge::open_with_clock(config, Arc::new(FixedClock(reference_now()))).expect("open lodge")
}

pub fn setup_test_lodge() -> Lodge {
    open_lodge(isolated_config())
}
