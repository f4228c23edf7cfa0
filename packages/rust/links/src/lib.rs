//! CSV link lists flattened into menu entries.
//!
//! Each CSV file contributes one `link` entry per data row followed by a
//! single `spacer`, so consecutive lists stay visually grouped in the menu.

mod reader;

use std::path::Path;

use tracing::{debug, instrument};

use menuforge_shared::{MenuBuilder, MenuItem, Result};

pub use reader::{LinkRecord, read_links};

/// Append the links of one CSV file plus its trailing spacer.
///
/// Returns the number of link rows appended.
#[instrument(skip(menu), fields(start = %menu.next_key()))]
pub fn flatten_file(path: &Path, menu: &mut MenuBuilder) -> Result<usize> {
    let links = read_links(path)?;
    let rows = links.len();

    for LinkRecord { name, href } in links {
        menu.push(MenuItem::link(name, href));
    }
    menu.push(MenuItem::Spacer);

    debug!(rows, "link list flattened");
    Ok(rows)
}

/// Flatten `csv_files` (names relative to `working_dir`) in list order.
///
/// Entries continue from the builder's next key; the returned value is the
/// counter after the final spacer. Every file, including the last and any
/// without data rows, is followed by a spacer.
#[instrument(skip_all, fields(files = csv_files.len()))]
pub fn flatten_links(
    csv_files: &[String],
    working_dir: &Path,
    menu: &mut MenuBuilder,
) -> Result<usize> {
    for file in csv_files {
        flatten_file(&working_dir.join(file), menu)?;
    }
    Ok(menu.next_key().index())
}
