//! CSV serialization of the wide table.

use std::env;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::reshape::WideTable;

/// Write the table as UTF-8 CSV: one header row, then one row per school,
/// no index column. Replaces any existing file at `path` by writing to a
/// temp file in the destination directory and renaming over the target, so
/// a failed run never leaves a half-written file behind.
pub fn write_csv(table: &WideTable, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => env::current_dir().context("resolving working directory")?,
    };

    let tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    {
        let mut w = BufWriter::new(tmp.as_file());
        write_record(&mut w, &table.header())?;
        for row in &table.rows {
            let mut fields = vec![row.school_id.clone(), row.school_name.clone()];
            fields.extend(row.values.iter().map(i64::to_string));
            write_record(&mut w, &fields)?;
        }
        w.flush().context("flushing CSV output")?;
    }
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;

    info!(path = %path.display(), rows = table.rows.len(), "wrote wide table");
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_record<W: Write>(w: &mut W, fields: &[String]) -> Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(w, ",")?;
        }
        if needs_quotes(field) {
            write!(w, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            write!(w, "{field}")?;
        }
    }
    writeln!(w)?;
    Ok(())
}
