//! CSV output sink with atomic tmp→rename

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::ExtractError;
use crate::table::{Table, cell_text};

/// Temporary sibling of `path` the table is written to before rename.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Rows that have no cell to write because the table has no columns.
fn unrepresentable_rows(table: &Table) -> usize {
    if table.num_columns() == 0 {
        table.num_rows()
    } else {
        0
    }
}

/// Write `table` to `path` as comma-separated UTF-8.
///
/// Header = column names, rows in table order, no index column. The file
/// appears at `path` only once fully written. Returns rows written.
pub fn write_csv(table: &Table, path: &Path) -> Result<usize, ExtractError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExtractError::write(parent, e))?;
    }

    let dropped = unrepresentable_rows(table);
    if dropped > 0 {
        log::warn!(
            "{dropped} records carry no attributes, {} will be empty",
            path.display()
        );
    }

    let tmp = tmp_path(path);
    // Clean up stale tmp file
    if tmp.exists() {
        fs::remove_file(&tmp).map_err(|e| ExtractError::write(&tmp, e))?;
    }

    let result = write_rows(table, &tmp).and_then(|n| {
        fs::rename(&tmp, path)?;
        Ok(n)
    });

    match result {
        Ok(n) => {
            log::info!("Wrote {n} rows to {}", path.display());
            Ok(n)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(ExtractError::write(path, e))
        }
    }
}

fn write_rows(table: &Table, path: &Path) -> io::Result<usize> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    // A zero-column table has no header and no representable rows
    let mut written = 0;
    if table.num_columns() > 0 {
        writer.write_record(table.columns()).map_err(io::Error::other)?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(cell_text))
                .map_err(io::Error::other)?;
            written += 1;
        }
    }

    writer.flush()?;
    let inner = writer.into_inner().map_err(|e| io::Error::other(e.to_string()))?;
    inner.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(written)
}
