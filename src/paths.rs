//! Bootstrap path resolution.
//!
//! Every command except `gen-config` starts here: work out the base folder
//! and the config folder, canonicalize both, and make sure the config folder
//! can actually be read before anything tries to load `config.toml` from it.
//!
//! ```text
//! <base>/            --base-path (default: current directory)
//! └── config/        --config-path (default: <base>/config)
//!     └── config.toml
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathsError {
    #[error("{0} doesn't exist or isn't a directory")]
    Missing(PathBuf),
    #[error("{path} isn't readable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolved, validated bootstrap folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub base: PathBuf,
    pub config: PathBuf,
}

impl AppPaths {
    /// Resolve folders from optional overrides, then validate them.
    pub fn resolve(base: Option<&Path>, config: Option<&Path>) -> Result<Self, PathsError> {
        let base = canonical_dir(base.unwrap_or_else(|| Path::new(".")))?;
        let config = match config {
            Some(path) => canonical_dir(path)?,
            None => canonical_dir(&base.join("config"))?,
        };
        ensure_readable(&config)?;
        tracing::debug!(base = %base.display(), config = %config.display(), "resolved paths");
        Ok(Self { base, config })
    }
}

fn canonical_dir(path: &Path) -> Result<PathBuf, PathsError> {
    match fs::canonicalize(path) {
        Ok(real) if real.is_dir() => Ok(real),
        _ => Err(PathsError::Missing(path.to_path_buf())),
    }
}

/// A folder is readable when its entries can be listed.
fn ensure_readable(path: &Path) -> Result<(), PathsError> {
    fs::read_dir(path)
        .map(|_| ())
        .map_err(|source| PathsError::Unreadable {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_to_config_under_base() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("config")).unwrap();

        let paths = AppPaths::resolve(Some(tmp.path()), None).unwrap();
        assert_eq!(paths.base, fs::canonicalize(tmp.path()).unwrap());
        assert_eq!(paths.config, paths.base.join("config"));
    }

    #[test]
    fn explicit_config_path_wins() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = tmp.path().join("settings");
        fs::create_dir(&elsewhere).unwrap();

        let paths = AppPaths::resolve(Some(tmp.path()), Some(&elsewhere)).unwrap();
        assert_eq!(paths.config, fs::canonicalize(&elsewhere).unwrap());
    }

    #[test]
    fn missing_config_folder_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = AppPaths::resolve(Some(tmp.path()), None);
        assert!(matches!(result, Err(PathsError::Missing(p)) if p.ends_with("config")));
    }

    #[test]
    fn file_instead_of_folder_is_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("config");
        fs::write(&file, "not a dir").unwrap();
        assert!(matches!(
            AppPaths::resolve(Some(tmp.path()), None),
            Err(PathsError::Missing(_))
        ));
    }

    #[test]
    fn missing_base_is_error() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("nope");
        assert!(matches!(
            AppPaths::resolve(Some(&gone), None),
            Err(PathsError::Missing(p)) if p == gone
        ));
    }
}
