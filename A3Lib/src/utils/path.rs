//! Path utilities
//!
//! Game content refers to files by project-internal paths such as
//! `\a3\data_f\box.paa`: backslash separated, case-insensitive and relative
//! to a project root (the P: drive). [`ProjectRoot`] maps between those
//! and host paths.

use std::path::{Component, Path, PathBuf};

/// Normalize path separators to forward slashes
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Get relative path and normalize separators
pub fn relative_path<P: AsRef<Path>>(path: P, base: P) -> Option<String> {
    path.as_ref()
        .strip_prefix(base.as_ref())
        .ok()
        .map(normalize_path)
}

/// Normalize a project-internal path: backslashes, no leading separator,
/// lowercase.
pub fn normalize_internal(path: &str) -> String {
    path.replace('/', "\\")
        .split('\\')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("\\")
        .to_lowercase()
}

/// A directory that project-internal paths are relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    root: PathBuf,
}

impl ProjectRoot {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Host path for an internal path like `\a3\data_f\box.paa`.
    ///
    /// Returns `None` if the internal path tries to leave the root.
    pub fn to_host(&self, internal: &str) -> Option<PathBuf> {
        let mut host = self.root.clone();
        for segment in internal.split(['\\', '/']) {
            match segment {
                "" | "." => {}
                ".." => return None,
                _ => host.push(segment),
            }
        }
        Some(host)
    }

    /// Internal path for a host path under the root, in normalized form.
    ///
    /// Returns `None` if `host` is not under the root.
    pub fn to_internal<P: AsRef<Path>>(&self, host: P) -> Option<String> {
        let relative = host.as_ref().strip_prefix(&self.root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_string_lossy().to_lowercase()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(segments.join("\\"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_path("a3\\data_f\\box.paa"), "a3/data_f/box.paa");
        assert_eq!(normalize_internal("/A3/Data_F//./box.paa"), "a3\\data_f\\box.paa");
        assert_eq!(
            relative_path(Path::new("/work/p/a3/box.p3d"), Path::new("/work/p")).as_deref(),
            Some("a3/box.p3d")
        );
    }

    #[test]
    fn test_project_root_round_trip() {
        let root = ProjectRoot::new("/work/p");
        let host = root.to_host("\\a3\\data_f\\box.paa").unwrap();
        assert_eq!(host, Path::new("/work/p/a3/data_f/box.paa"));
        assert_eq!(root.to_internal(&host).as_deref(), Some("a3\\data_f\\box.paa"));
    }

    #[test]
    fn test_project_root_rejects_escape() {
        let root = ProjectRoot::new("/work/p");
        assert_eq!(root.to_host("..\\secret.txt"), None);
        assert_eq!(root.to_internal("/elsewhere/box.paa"), None);
    }
}
