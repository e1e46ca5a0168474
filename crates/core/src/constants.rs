/// Blob key of the case collection
pub const CASES_KEY: &str = "cases";

/// Blob key of the ledger collection
pub const LEDGERS_KEY: &str = "ledgers";

/// Blob key of the user collection
pub const USERS_KEY: &str = "users";

/// Blob key of the application settings
pub const SETTINGS_KEY: &str = "settings";

/// Blob key of the monitoring registry
pub const MONITORING_KEY: &str = "monitoring";

/// Every key the blob store is expected to hold
pub const BLOB_KEYS: [&str; 5] = [CASES_KEY, LEDGERS_KEY, USERS_KEY, SETTINGS_KEY, MONITORING_KEY];

/// Decimal places of stored currency amounts
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Default minutes between two monitoring checks of the same case
pub const DEFAULT_MONITOR_INTERVAL_MINUTES: u32 = 30;

/// Number of movements listed in the dashboard summary
pub const RECENT_MOVEMENTS_LIMIT: usize = 10;
