//! Output assembler.
//!
//! Renders the assembled menu and article indexes and writes them to the
//! output directory:
//! ```text
//! <output_dir>/
//! ├── <subdirectory>.json   (one per article folder)
//! ├── menu_items.js
//! └── menu_items.json       (only with emit_json)
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use menuforge_shared::{GenerateConfig, MenuforgeError, Result};

use crate::menu::AssembledMenu;

/// Metadata for a single written output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write every output for an assembled menu, article indexes first.
#[instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
pub fn write_outputs(config: &GenerateConfig, assembled: &AssembledMenu) -> Result<Vec<WrittenFile>> {
    let mut written = Vec::with_capacity(assembled.folders.len() + 2);

    for folder in &assembled.folders {
        let json = render_json(&folder.index, config.indent)?;
        written.push(write_output(&config.output_dir, &folder.file_name, &json)?);
    }

    let json = render_json(&assembled.menu, config.indent)?;
    let script = render_script(&json, &config.variable);
    written.push(write_output(&config.output_dir, &config.script_name, &script)?);

    if config.emit_json {
        written.push(write_output(
            &config.output_dir,
            &menu_json_name(&config.variable),
            &json,
        )?);
    }

    info!(count = written.len(), "outputs written");
    Ok(written)
}

/// Pretty-print `data` as JSON with `indent` spaces per level.
///
/// Non-ASCII text is written as raw UTF-8 rather than `\uXXXX` escapes.
pub fn render_json<T: Serialize>(data: &T, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    data.serialize(&mut serializer)
        .map_err(|e| MenuforgeError::Serialization(format!("JSON serialization failed: {e}")))?;

    String::from_utf8(buf).map_err(|e| MenuforgeError::Serialization(e.to_string()))
}

/// Wrap JSON text in the script module template.
pub fn render_script(json: &str, variable: &str) -> String {
    format!("{variable} = {json};\nexport let {variable};")
}

/// File name of the standalone menu JSON document.
pub fn menu_json_name(variable: &str) -> String {
    format!("{variable}.json")
}

/// Write a file atomically (temp sibling, then rename) and record its digest.
pub fn write_output(dir: &Path, file_name: &str, content: &str) -> Result<WrittenFile> {
    let target = dir.join(file_name);
    let temp = dir.join(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| MenuforgeError::io(&temp, e))?;
    if let Err(e) = std::fs::rename(&temp, &target) {
        let _ = std::fs::remove_file(&temp);
        return Err(MenuforgeError::io(&target, e));
    }

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(path = %target.display(), size = content.len(), "wrote output");

    Ok(WrittenFile {
        path: target,
        sha256,
        size_bytes: content.len(),
    })
}
