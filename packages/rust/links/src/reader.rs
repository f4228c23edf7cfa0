//! Positional CSV reading.
//!
//! The header row is always consumed and discarded. Whatever its text, the
//! first column is taken as the link name and the second as the href; any
//! further columns are ignored. Empty and whitespace-only lines carry no
//! row.

use std::path::Path;

use tracing::debug;

use menuforge_shared::{MenuforgeError, Result};

/// Minimum number of columns a link list must expose.
const REQUIRED_COLUMNS: usize = 2;

/// One CSV row, read positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub name: String,
    pub href: String,
}

/// Read every data row of a link list in file order.
///
/// A zero-byte file yields no rows. A header or row with fewer than two
/// columns is a [`MenuforgeError::MalformedTable`].
pub fn read_links(path: &Path) -> Result<Vec<LinkRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| table_error(path, e))?;

    let header_len = reader.headers().map_err(|e| table_error(path, e))?.len();
    if header_len == 0 {
        debug!(path = %path.display(), "empty link list");
        return Ok(Vec::new());
    }
    if header_len < REQUIRED_COLUMNS {
        return Err(MenuforgeError::malformed(
            path,
            format!("header exposes {header_len} column(s), expected at least {REQUIRED_COLUMNS}"),
        ));
    }

    let mut links = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| table_error(path, e))?;
        if is_blank(&record) {
            continue;
        }
        if record.len() < REQUIRED_COLUMNS {
            let line = record.position().map_or(0, |p| p.line());
            return Err(MenuforgeError::malformed(
                path,
                format!(
                    "line {line} exposes {} column(s), expected at least {REQUIRED_COLUMNS}",
                    record.len()
                ),
            ));
        }
        links.push(LinkRecord {
            name: record[0].to_string(),
            href: record[1].to_string(),
        });
    }

    Ok(links)
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record[0].trim().is_empty()
}

fn table_error(path: &Path, err: csv::Error) -> MenuforgeError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => MenuforgeError::io(path, source),
        _ => MenuforgeError::malformed(path, message),
    }
}
