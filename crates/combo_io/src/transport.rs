//! File-backed catalog transport. Delivers at most once; any read or parse
//! failure is a fetch failure.

use std::path::{Path, PathBuf};

use combo_core::{Catalog, CatalogTransport};

use crate::loader::load_catalog;
use crate::IoError;

#[derive(Debug, Clone)]
pub struct FileCatalogTransport {
    path: PathBuf,
    delivered: bool,
}

impl FileCatalogTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), delivered: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn delivered(&self) -> bool {
        self.delivered
    }
}

impl CatalogTransport for FileCatalogTransport {
    type Error = IoError;

    fn fetch(&mut self) -> Result<Catalog, IoError> {
        if self.delivered {
            return Err(IoError::Invalid(format!(
                "catalog {} already delivered",
                self.path.display()
            )));
        }
        self.delivered = true;
        load_catalog(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetches_once() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("catalog.json");
        std::fs::write(&p, r#"[{"Attributes":[],"InStock":true}]"#).unwrap();

        let mut t = FileCatalogTransport::new(&p);
        assert_eq!(t.fetch().unwrap().len(), 1);
        assert!(t.delivered());
        assert!(matches!(t.fetch(), Err(IoError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = FileCatalogTransport::new(dir.path().join("absent.json"));
        assert!(t.fetch().is_err());
        assert!(t.delivered());
    }
}
