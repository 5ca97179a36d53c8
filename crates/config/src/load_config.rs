// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::{Path, PathBuf};

use path_clean::clean;

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = PathBuf::from(path);

    loop {
        let file_path = current.join(filename);
        if file_path.exists() {
            return Some(file_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Pick the configuration file to load. An explicit file wins, otherwise the
/// nearest `default_filename` at or above `cwd`. `None` means defaults only.
pub fn resolve_config_path<P: Into<PathBuf>>(
    find_in_parent: FindInParent,
    cwd: P,
    default_filename: &str,
    explicit_file: Option<P>,
) -> Option<PathBuf> {
    let cwd = cwd.into();

    if let Some(file) = explicit_file.map(Into::into) {
        if file.is_absolute() {
            return Some(file);
        }
        return Some(clean(cwd.join(file)));
    }

    find_in_parent(&cwd, default_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn not_found(_: &Path, _: &str) -> Option<PathBuf> {
        None
    }

    fn found(_: &Path, _: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/foo/anonset.config.yaml"))
    }

    #[test]
    fn test_resolve_explicit_file() -> Result<()> {
        let path = resolve_config_path(
            found,
            PathBuf::from("/foo/bar"),
            "anonset.config.yaml",
            Some(PathBuf::from("/my/absolute/conf.yaml")),
        );
        assert_eq!(path, Some(PathBuf::from("/my/absolute/conf.yaml")));

        let path = resolve_config_path(
            found,
            PathBuf::from("/foo/bar"),
            "anonset.config.yaml",
            Some(PathBuf::from("../conf.yaml")),
        );
        assert_eq!(path, Some(PathBuf::from("/foo/conf.yaml")));
        Ok(())
    }

    #[test]
    fn test_resolve_search() -> Result<()> {
        let path = resolve_config_path(
            found,
            PathBuf::from("/foo/bar"),
            "anonset.config.yaml",
            None,
        );
        assert_eq!(path, Some(PathBuf::from("/foo/anonset.config.yaml")));

        let path = resolve_config_path(
            not_found,
            PathBuf::from("/foo/bar"),
            "anonset.config.yaml",
            None,
        );
        assert_eq!(path, None);
        Ok(())
    }

    #[test]
    fn test_find_in_parent_walks_up() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(dir.path().join("anonset.config.yaml"), "")?;

        assert_eq!(
            find_in_parent(&nested, "anonset.config.yaml"),
            Some(dir.path().join("anonset.config.yaml"))
        );
        assert_eq!(find_in_parent(&nested, "missing.yaml"), None);
        Ok(())
    }
}
