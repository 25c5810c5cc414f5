//! Default locations for supervisor state.
//!
//! ```text
//! ~/.wishful/radio/        # artifact repository
//! <tmp>/radio-program.log  # program stdout
//! <tmp>/radio-program-err.log
//! ```
//!
//! # Environment Variables
//!
//! - `RADIO_HOME`: Override the artifact repository directory
//! - `RADIO_LOG_DIR`: Override the directory holding program output logs

use std::path::PathBuf;

/// Environment variable for a custom artifact directory.
pub const RADIO_HOME_ENV: &str = "RADIO_HOME";

/// Environment variable for a custom program log directory.
pub const LOG_DIR_ENV: &str = "RADIO_LOG_DIR";

const DEFAULT_ROOT: &str = ".wishful";
const RADIO_SUBDIR: &str = "radio";
const STDOUT_LOG: &str = "radio-program.log";
const STDERR_LOG: &str = "radio-program-err.log";

/// Get the artifact repository directory.
///
/// Determined by:
/// 1. `RADIO_HOME` if set
/// 2. `~/.wishful/radio` if a home directory is available
/// 3. `.wishful/radio` in the current directory as fallback
pub fn artifact_root() -> PathBuf {
    std::env::var(RADIO_HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_ROOT))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))
                .join(RADIO_SUBDIR)
        })
}

/// Get the directory program output logs are written to.
///
/// Defaults to the system temp directory or `RADIO_LOG_DIR`.
pub fn log_dir() -> PathBuf {
    std::env::var(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir())
}

/// Get the program stdout log.
pub fn stdout_log() -> PathBuf {
    log_dir().join(STDOUT_LOG)
}

/// Get the program stderr log.
pub fn stderr_log() -> PathBuf {
    log_dir().join(STDERR_LOG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_share_directory() {
        assert_eq!(stdout_log().parent(), stderr_log().parent());
        assert_eq!(stdout_log().parent(), Some(log_dir().as_path()));
    }

    #[test]
    fn test_artifact_root_default_shape() {
        if std::env::var(RADIO_HOME_ENV).is_ok() {
            return;
        }
        let root = artifact_root();
        assert!(root.ends_with(".wishful/radio"));
    }
}
