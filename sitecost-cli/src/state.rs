//! Per-user state directory (`~/.sitecost`, or `$SITECOST_HOME`).

use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

pub const HOME_ENV: &str = "SITECOST_HOME";

pub fn sitecost_home() -> Result<PathBuf> {
    resolve_home(std::env::var_os(HOME_ENV), std::env::var_os("HOME"))
}

/// An explicit, non-empty override wins; otherwise `.sitecost` under the
/// user's home directory.
fn resolve_home(override_dir: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    match home.filter(|h| !h.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(".sitecost")),
        None => bail!("neither {HOME_ENV} nor HOME is set"),
    }
}

pub fn ensure_sitecost_home() -> Result<PathBuf> {
    let dir = sitecost_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_home() {
        let dir = resolve_home(Some("/srv/obra".into()), Some("/home/ana".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/obra"));
    }

    #[test]
    fn test_falls_back_to_dot_dir_in_home() {
        let dir = resolve_home(Some("".into()), Some("/home/ana".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/ana/.sitecost"));
        let dir = resolve_home(None, Some("/home/ana".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/ana/.sitecost"));
    }

    #[test]
    fn test_no_home_at_all_is_error() {
        assert!(resolve_home(None, None).is_err());
    }
}
