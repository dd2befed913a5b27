use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::errors::{Result, SheetError};
use crate::ledger::LineItem;

pub const SHEET_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores each sheet as `<name>.json` in one directory. Every save rewrites
/// the whole file; the persisted array is always the complete committed
/// sequence.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn sheet_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, SHEET_EXTENSION))
    }

    /// Persists the full committed sequence for `name`.
    pub fn save(&self, name: &str, items: &[LineItem]) -> Result<()> {
        let path = self.sheet_path(name);
        let json = serde_json::to_string_pretty(items)?;
        let tmp = tmp_path(&path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        debug!(sheet = name, items = items.len(), "sheet saved");
        Ok(())
    }

    /// Reads the committed sequence for `name`. A missing file is an empty
    /// sheet, not an error. Field types are checked during deserialization
    /// but the values are trusted as-is; nothing is recomputed.
    pub fn load(&self, name: &str) -> Result<Vec<LineItem>> {
        let path = self.sheet_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        let items: Vec<LineItem> = serde_json::from_str(&data)?;
        debug!(sheet = name, items = items.len(), "sheet loaded");
        Ok(items)
    }

    /// Names of every sheet file in the store directory, extension stripped
    /// and sorted.
    pub fn list_sheets(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SHEET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Sheet names are restricted to `[A-Za-z0-9_-]+`.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SheetError::InvalidSheetName(name.to_string()))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
