// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{RelayerConfig, RelayerConfigFile};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use path_clean::clean;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_NAME: &str = "relayer.config.yaml";
pub const ENV_PREFIX: &str = "FHR_";

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = path.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.is_file() {
            return Some(file_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// The explicit file wins (relative paths are taken from `cwd`), otherwise the nearest
/// `filename` in `cwd` or one of its parents. `None` means configuration comes from defaults
/// and the environment only.
pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: &Path,
    filename: &str,
    explicit: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(explicit) = explicit {
        if explicit.is_absolute() {
            return Some(explicit.to_path_buf());
        }
        return Some(clean(cwd.join(explicit)));
    }

    find_in_parent(cwd, filename)
}

/// Layer defaults, the resolved YAML file and `FHR_` environment variables (`__` separates
/// nested keys, eg. `FHR_REQUEST__TIMEOUT_MS`), then validate the result.
pub fn load_config(cwd: &Path, explicit: Option<&Path>) -> Result<RelayerConfig> {
    let resolved = resolve_config_path(find_in_parent, cwd, DEFAULT_CONFIG_NAME, explicit);

    let mut figment = Figment::from(Serialized::defaults(RelayerConfigFile::default()));
    match &resolved {
        Some(path) => {
            if !path.is_file() {
                bail!("Configuration file {} not found", path.display());
            }
            info!(path = %path.display(), "loading relayer configuration");
            figment = figment.merge(Yaml::file(path));
        }
        None => debug!("no {DEFAULT_CONFIG_NAME} found, using defaults and environment"),
    }

    let file: RelayerConfigFile = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Could not parse relayer configuration")?;

    RelayerConfig::try_from(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_config_path() {
        fn not_found(_: &Path, _: &str) -> Option<PathBuf> {
            None
        }
        fn found(_: &Path, _: &str) -> Option<PathBuf> {
            Some(PathBuf::from("/foo/relayer.config.yaml"))
        }
        let cwd = Path::new("/foo/bar");

        assert_eq!(
            resolve_config_path(not_found, cwd, DEFAULT_CONFIG_NAME, None),
            None
        );
        assert_eq!(
            resolve_config_path(found, cwd, DEFAULT_CONFIG_NAME, None),
            Some(PathBuf::from("/foo/relayer.config.yaml"))
        );
        assert_eq!(
            resolve_config_path(
                found,
                cwd,
                DEFAULT_CONFIG_NAME,
                Some(Path::new("/my/conf.yaml"))
            ),
            Some(PathBuf::from("/my/conf.yaml"))
        );
        assert_eq!(
            resolve_config_path(
                found,
                cwd,
                DEFAULT_CONFIG_NAME,
                Some(Path::new("../conf/relayer.yaml"))
            ),
            Some(PathBuf::from("/foo/conf/relayer.yaml"))
        );
    }

    #[test]
    fn test_find_in_parent() -> Result<()> {
        let root = tempfile::tempdir()?;
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested)?;
        assert_eq!(find_in_parent(&nested, DEFAULT_CONFIG_NAME), None);

        let file = root.path().join("a").join(DEFAULT_CONFIG_NAME);
        fs::write(&file, "relayer_url: http://localhost:3000\n")?;
        assert_eq!(find_in_parent(&nested, DEFAULT_CONFIG_NAME), Some(file));
        Ok(())
    }
}
