// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::csv::{write_row, Delim};
use crate::error::{Error, Result};
use crate::tables::Table;

/// Create/truncate `<dir>/<table.name>.<ext>` and write header + rows.
pub fn write_table(dir: &Path, table: &Table, delim: Delim) -> Result<PathBuf> {
    ensure_directory(dir)?;
    let path = dir.join(join!(table.name, ".", delim.ext()));

    let file = File::create(&path)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    write_row(&mut out, table.headers, delim.sep())?;
    for row in &table.rows {
        write_row(&mut out, row, delim.sep())?;
    }
    out.flush()?;
    logd!("Wrote {} rows to {}", table.len(), path.display());
    Ok(path)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Input(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Page files in `dir` whose name starts with `prefix` and ends in `.ext`,
/// sorted by file name so runs are reproducible.
pub fn list_pages(dir: &Path, prefix: &str, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Input(format!("Not a directory: {}", dir.display())));
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() { continue; }
        let name_ok = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|n| n.starts_with(prefix));
        let ext_ok = path.extension().and_then(|s| s.to_str()) == Some(ext);
        if name_ok && ext_ok {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Page text; invalid UTF-8 is replaced rather than rejected.
pub fn read_page(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            logw!("{}: invalid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(&e.into_bytes()).into_owned()
        }
    })
}

/// `shift0042.html` → `shift0042`
pub fn page_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
