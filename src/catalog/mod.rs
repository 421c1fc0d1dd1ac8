use crate::error::{AppError, ErrorKind};
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::{fs, path::PathBuf};

/// A static directory containing the vendor probe tables.
static INTERNAL_DATA_DIR: Dir = include_dir!("src/data");

/// One probe entry: the MIB a driver should be pointed at, the vendor
/// `sysObjectID` that identifies it, and a complementary OID whose readability
/// confirms the MIB (and usually yields a printable device description).
///
/// At least one of `sysoid` / `oid` is non-empty in every shipped entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub mib: String,
    #[serde(default)]
    pub sysoid: String,
    #[serde(default)]
    pub oid: String,
}

impl CatalogEntry {
    pub fn has_sysoid(&self) -> bool {
        !self.sysoid.is_empty()
    }

    pub fn has_probe_oid(&self) -> bool {
        !self.oid.is_empty()
    }
}

/// Loads the probe catalog, either from the embedded vendor tables or from a
/// user-supplied directory of JSON files.
///
/// Files are visited in name order and entries keep their in-file order, so
/// the catalog order is stable across runs; match reporting relies on that.
pub fn load_catalog(data_dir: Option<PathBuf>) -> Result<Vec<CatalogEntry>, AppError> {
    let mut entries = Vec::new();

    if let Some(dir) = data_dir {
        if !dir.is_dir() {
            return Err(AppError::new(ErrorKind::InvalidDirectory));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|_| AppError::new(ErrorKind::DirectoryRead))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path)
                .map_err(|_| AppError::new(ErrorKind::DirectoryRead))?;
            entries.extend(parse_vendor_table(&content, &path.display().to_string())?);
        }
    } else {
        let mut files: Vec<_> = INTERNAL_DATA_DIR
            .files()
            .filter(|file| file.path().extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        files.sort_by(|a, b| a.path().cmp(b.path()));

        for file in files {
            let content = file.contents_utf8().ok_or_else(|| {
                AppError::new(ErrorKind::Catalog(format!(
                    "{} is not valid UTF-8",
                    file.path().display()
                )))
            })?;
            entries.extend(parse_vendor_table(content, &file.path().display().to_string())?);
        }
    }

    if entries.is_empty() {
        return Err(AppError::new(ErrorKind::Catalog(
            "no probe entries found".to_string(),
        )));
    }

    Ok(entries)
}

fn parse_vendor_table(content: &str, origin: &str) -> Result<Vec<CatalogEntry>, AppError> {
    serde_json::from_str::<Vec<CatalogEntry>>(content)
        .map_err(|e| AppError::new(ErrorKind::Catalog(format!("{origin}: {e}"))))
}
