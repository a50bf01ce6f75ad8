//! Access to view files: existence checks for layout lookup, and
//! reading for engines that want to go through the same place.

use std::{collections::HashMap,
          path::{Path, PathBuf}};

use anyhow::{Result, anyhow};

use crate::util::my_read_to_string;

pub trait ViewFs {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

impl<F: ViewFs + ?Sized> ViewFs for &F {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }
}

/// The host file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl ViewFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
    fn read_to_string(&self, path: &Path) -> Result<String> {
        my_read_to_string(path)
    }
}

/// Files held in memory, keyed by path (compared by components, as
/// `Path` does, thus `a//b` finds `a/b` but `a/../b` doesn't).
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<PathBuf, String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn with(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl ViewFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files.get(path).cloned().ok_or_else(
            || anyhow!("no such file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_memory_fs() {
        let fs = MemoryFs::new().with("/views/main.ejs", "M");
        assert!(fs.exists(Path::new("/views/main.ejs")));
        assert_eq!(fs.read_to_string(Path::new("/views/main.ejs")).unwrap(), "M");
        let e = fs.read_to_string(Path::new("/nope.ejs")).unwrap_err();
        assert_eq!(e.to_string(), "no such file: \"/nope.ejs\"");
    }

    #[test]
    fn t_std_fs() {
        let fs = StdFs;
        assert!(fs.exists(Path::new(env!("CARGO_MANIFEST_DIR"))));
        assert!(!fs.exists(Path::new("/surely/not/here/layout.ejs")));
        let e = fs.read_to_string(Path::new("/surely/not/here/layout.ejs")).unwrap_err();
        assert!(e.to_string().starts_with("opening path for reading"));
    }
}
