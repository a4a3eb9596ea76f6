use std::env;
use std::path::PathBuf;

/// Default SQLite database filename inside the Planline directory
pub const DB_FILE: &str = "planline.db";

/// Get the path to the Planline directory (~/.planline)
pub fn planline_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".planline")
    } else {
        // Fall back to dirs crate for normal usage
        dirs::home_dir()
            .expect("Unable to get home directory")
            .join(".planline")
    }
}

/// Get the path to the database file (~/.planline/planline.db)
pub fn database_file() -> PathBuf {
    planline_dir().join(DB_FILE)
}
