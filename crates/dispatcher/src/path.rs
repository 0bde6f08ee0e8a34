//! Per-host destination paths
//!
//! A template such as `/var/log/%HOSTNAME%/` becomes
//! `/var/log/<hostname>/syslog.log`. Only the first placeholder is
//! substituted.

use std::fs;
use std::path::PathBuf;

use contracts::{is_routable_hostname, HOSTNAME_PLACEHOLDER, LOG_FILE_NAME};

use crate::error::PathError;

/// Resolve the log file for `hostname`, creating its directory
///
/// Directory creation is idempotent. The hostname must be a single path
/// component.
///
/// # Errors
/// - [`PathError::UnsafeHostname`] when [`is_routable_hostname`] rejects it
/// - [`PathError::CreateDir`] when the directory cannot be created
pub fn resolve(template: &str, hostname: &str) -> Result<PathBuf, PathError> {
    if !is_routable_hostname(hostname) {
        return Err(PathError::UnsafeHostname {
            hostname: hostname.to_string(),
        });
    }

    let dir = PathBuf::from(template.replacen(HOSTNAME_PLACEHOLDER, hostname, 1));
    fs::create_dir_all(&dir).map_err(|source| PathError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    Ok(dir.join(LOG_FILE_NAME))
}
