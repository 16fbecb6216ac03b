//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default directory base URL (the store backend)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// User agent sent to the directory and IP locator
pub const DEFAULT_USER_AGENT: &str = "guinea-geo/0.1.0";

/// Keystroke pause before an address search is issued
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Shortest trimmed query that triggers a search
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Position request timeout
pub const DEFAULT_POSITION_TIMEOUT_SECS: u64 = 10;

/// Oldest cached fix accepted (5 minutes)
pub const DEFAULT_POSITION_MAX_AGE_SECS: u64 = 300;

/// Ask the sensor for its best fix
pub const DEFAULT_HIGH_ACCURACY: bool = true;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "guinea-geo";
