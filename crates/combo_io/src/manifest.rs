// crates/combo_io/src/manifest.rs
//
// Session manifest: where the catalog, product layout and (optionally) the
// selection live, plus optional catalog digest and selection order.
//
// • Paths are relative to the manifest's directory unless absolute.
// • Offline-only: any path with a scheme ("://", "http:", "https:") is rejected.
// • `catalog_sha256`, when given, must be 64-lower-hex and is checked against the
//   canonical JSON of the decoded catalog.
// • Required inputs must exist and be files.

use std::fs;
use std::path::{Path, PathBuf};

use combo_core::{Catalog, SelectionOrder};
use serde::{Deserialize, Serialize};

use crate::hasher::catalog_id;
use crate::loader::read_json_value_with_limits;
use crate::IoError;

/// External manifest accepted by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub catalog_path: String,
    pub product_path: String,
    #[serde(default)]
    pub selection_path: Option<String>,
    /// Expected digest of the canonical catalog (bare 64-hex).
    #[serde(default)]
    pub catalog_sha256: Option<String>,
    #[serde(default)]
    pub selection_order: Option<SelectionOrder>,
}

/// Paths resolved against the manifest's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub catalog_path: PathBuf,
    pub product_path: PathBuf,
    pub selection_path: Option<PathBuf>,
    pub catalog_sha256: Option<String>,
    pub selection_order: Option<SelectionOrder>,
}

#[inline]
fn has_any_scheme(s: &str) -> bool {
    s.contains("://") || s.starts_with("http:") || s.starts_with("https:")
}

#[inline]
fn is_lower_hex_64(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[inline]
fn join_under(base: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn check_path_field(key: &str, value: &str) -> Result<(), IoError> {
    if value.trim().is_empty() {
        return Err(IoError::Manifest(format!("field must not be empty: {key}")));
    }
    if has_any_scheme(value) {
        return Err(IoError::Manifest(format!("path must be offline (no scheme) for {key}: {value}")));
    }
    Ok(())
}

/// Shape and offline policy. No I/O.
pub fn validate(man: &Manifest) -> Result<(), IoError> {
    check_path_field("catalog_path", &man.catalog_path)?;
    check_path_field("product_path", &man.product_path)?;
    if let Some(s) = &man.selection_path {
        check_path_field("selection_path", s)?;
    }
    if let Some(h) = &man.catalog_sha256 {
        if !is_lower_hex_64(h) {
            return Err(IoError::Manifest(format!("invalid sha256 format for catalog_sha256: {h}")));
        }
    }
    Ok(())
}

fn existing_file(key: &str, p: PathBuf) -> Result<PathBuf, IoError> {
    let md = fs::metadata(&p)
        .map_err(|e| IoError::Path(format!("cannot access {key} {}: {e}", p.display())))?;
    if !md.is_file() {
        return Err(IoError::Path(format!("path is not a file for {key}: {}", p.display())));
    }
    Ok(p)
}

/// Resolve relative paths under `base` and check the inputs exist.
pub fn resolve(man: &Manifest, base: &Path) -> Result<ResolvedManifest, IoError> {
    validate(man)?;
    let catalog_path = existing_file("catalog_path", join_under(base, &man.catalog_path))?;
    let product_path = existing_file("product_path", join_under(base, &man.product_path))?;
    let selection_path = man
        .selection_path
        .as_deref()
        .map(|s| existing_file("selection_path", join_under(base, s)))
        .transpose()?;
    Ok(ResolvedManifest {
        catalog_path,
        product_path,
        selection_path,
        catalog_sha256: man.catalog_sha256.clone(),
        selection_order: man.selection_order,
    })
}

pub fn load_manifest(path: &Path) -> Result<Manifest, IoError> {
    let v = read_json_value_with_limits(path)?;
    serde_json::from_value(v).map_err(|e| IoError::Manifest(e.to_string()))
}

/// Read, validate and resolve the manifest at `path`.
pub fn load_and_resolve_manifest(path: &Path) -> Result<ResolvedManifest, IoError> {
    let man = load_manifest(path)?;
    let base = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    resolve(&man, base)
}

/// Compare the declared digest (if any) with the decoded catalog's.
pub fn verify_catalog_digest(resolved: &ResolvedManifest, catalog: &Catalog) -> Result<(), IoError> {
    let Some(expected) = &resolved.catalog_sha256 else {
        return Ok(());
    };
    let actual = catalog_id(catalog)?;
    if actual.as_hex() != expected {
        return Err(IoError::Expect(format!(
            "catalog sha256 mismatch: expected {expected}, got {}",
            actual.as_hex()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_catalog;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).unwrap();
        p
    }

    fn base_manifest() -> Manifest {
        Manifest {
            catalog_path: "catalog.json".into(),
            product_path: "product.json".into(),
            selection_path: None,
            catalog_sha256: None,
            selection_order: None,
        }
    }

    #[test]
    fn rejects_urls_and_bad_digests() {
        let mut m = base_manifest();
        m.catalog_path = "https://shop.example/catalog.json".into();
        assert!(matches!(validate(&m), Err(IoError::Manifest(_))));

        let mut m = base_manifest();
        m.product_path = "  ".into();
        assert!(validate(&m).is_err());

        let mut m = base_manifest();
        m.catalog_sha256 = Some("ABC".into());
        assert!(validate(&m).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(
            dir.path(),
            "manifest.json",
            r#"{"catalog_path":"c.json","product_path":"p.json","retries":3}"#,
        );
        assert!(matches!(load_manifest(&p), Err(IoError::Manifest(_))));
    }

    #[test]
    fn resolves_relative_to_manifest_dir_and_checks_digest() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "catalog.json", r#"[{"Attributes":[{"Id":1,"ValueIds":[10]}],"InStock":true}]"#);
        write(dir.path(), "product.json", r#"{"attributes":[{"id":1,"values":[10]}]}"#);
        write(dir.path(), "selection.json", r#"[{"attribute_id":1,"values":[10]}]"#);
        let mp = write(
            dir.path(),
            "manifest.json",
            r#"{"catalog_path":"catalog.json","product_path":"product.json","selection_path":"selection.json","selection_order":"touched"}"#,
        );

        let mut r = load_and_resolve_manifest(&mp).unwrap();
        assert_eq!(r.catalog_path, dir.path().join("catalog.json"));
        assert_eq!(r.selection_path, Some(dir.path().join("selection.json")));
        assert_eq!(r.selection_order, Some(SelectionOrder::Touched));

        let catalog = load_catalog(&r.catalog_path).unwrap();
        verify_catalog_digest(&r, &catalog).unwrap();

        let good = catalog_id(&catalog).unwrap().as_hex().to_string();
        r.catalog_sha256 = Some(good);
        verify_catalog_digest(&r, &catalog).unwrap();

        r.catalog_sha256 = Some("0".repeat(64));
        assert!(matches!(verify_catalog_digest(&r, &catalog), Err(IoError::Expect(_))));
    }

    #[test]
    fn missing_inputs_fail_resolution() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "catalog.json", "[]");
        let err = resolve(&base_manifest(), dir.path()).unwrap_err();
        assert!(matches!(err, IoError::Path(_)));
    }
}
