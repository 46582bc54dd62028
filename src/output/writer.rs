//! Paired JSON / script artifacts
//!
//! Every dataset is written twice from the same serialized string: once as a
//! plain JSON document and once as `const NAME=<json>` for pages that load
//! it with a script tag.

use crate::output::catalog::Catalog;
use crate::output::{OutputError, OutputResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File stem of the coupon catalog artifacts
pub const CATALOG_STEM: &str = "coupon";

/// Constant name the front end reads the catalog from
pub const CATALOG_CONSTANT: &str = "COUPON_DICT";

/// Locations of one written artifact pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub json: PathBuf,
    pub script: PathBuf,
}

/// Serializes `value` once and writes `<stem>.json` and `<stem>.js` to `dir`
///
/// Non-ASCII text is written verbatim. The directory is created if missing.
pub fn write_artifacts<T>(
    value: &T,
    dir: &Path,
    stem: &str,
    constant: &str,
) -> OutputResult<ArtifactPaths>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string(value)?;
    fs::create_dir_all(dir)?;

    let paths = ArtifactPaths {
        json: dir.join(format!("{}.json", stem)),
        script: dir.join(format!("{}.js", stem)),
    };
    fs::write(&paths.json, &payload)?;
    fs::write(&paths.script, format!("{}{}", script_prefix(constant), payload))?;

    tracing::info!(
        "Wrote {} and {} ({} bytes)",
        paths.json.display(),
        paths.script.display(),
        payload.len()
    );
    Ok(paths)
}

/// Writes `coupon.json` and `coupon.js`
pub fn write_catalog(catalog: &Catalog, dir: &Path) -> OutputResult<ArtifactPaths> {
    write_artifacts(catalog, dir, CATALOG_STEM, CATALOG_CONSTANT)
}

/// Reads a catalog from either artifact; the script prefix is optional
pub fn read_catalog(path: &Path) -> OutputResult<Catalog> {
    let content = fs::read_to_string(path)?;
    let json = content
        .trim_start()
        .strip_prefix(&script_prefix(CATALOG_CONSTANT))
        .unwrap_or(content.as_str());
    serde_json::from_str(json.trim()).map_err(|source| OutputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the previous catalog from `dir`, preferring `coupon.json`
///
/// Returns `Ok(None)` when neither artifact exists.
pub fn load_existing_catalog(dir: &Path) -> OutputResult<Option<Catalog>> {
    for file_name in [
        format!("{}.json", CATALOG_STEM),
        format!("{}.js", CATALOG_STEM),
    ] {
        let path = dir.join(file_name);
        if path.is_file() {
            tracing::info!("Loading existing catalog from {}", path.display());
            return read_catalog(&path).map(Some);
        }
    }
    Ok(None)
}

fn script_prefix(constant: &str) -> String {
    format!("const {}=", constant)
}
