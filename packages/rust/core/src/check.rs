//! Consistency check for a generated output directory.
//!
//! Reads the script module back, recovers the embedded menu JSON, and
//! confirms every modal entry points at a readable article index.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use menuforge_shared::{ArticleIndex, MenuItem, MenuMap, MenuforgeError, Result};

/// Counts gathered while checking an output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub items: usize,
    pub modals: usize,
    pub links: usize,
    pub spacers: usize,
    pub articles: usize,
}

/// Verify that `output_dir` holds a consistent menu and article indexes.
#[instrument(skip_all, fields(output_dir = %output_dir.display()))]
pub fn check_outputs(output_dir: &Path, script_name: &str, variable: &str) -> Result<CheckReport> {
    let script_path = output_dir.join(script_name);
    let script =
        std::fs::read_to_string(&script_path).map_err(|e| MenuforgeError::io(&script_path, e))?;

    let menu = parse_script(&script, variable)?;
    if !menu.is_contiguous() {
        return Err(MenuforgeError::validation(format!(
            "{script_name}: menu keys are not contiguous from item_0"
        )));
    }

    let mut report = CheckReport {
        items: menu.len(),
        ..CheckReport::default()
    };

    for (key, item) in menu.iter() {
        match item {
            MenuItem::Modal { file, .. } => {
                report.modals += 1;
                report.articles += read_index(output_dir, file)
                    .inspect_err(|e| warn!(%key, %file, error = %e, "broken modal entry"))?
                    .len();
            }
            MenuItem::Link { .. } => report.links += 1,
            MenuItem::Spacer => report.spacers += 1,
        }
    }

    debug!(?report, "output directory consistent");
    Ok(report)
}

/// Recover the menu from the text of a generated script module.
pub fn parse_script(script: &str, variable: &str) -> Result<MenuMap> {
    let prefix = format!("{variable} = ");
    let suffix = format!(";\nexport let {variable};");

    let json = script
        .strip_prefix(prefix.as_str())
        .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        .ok_or_else(|| {
            MenuforgeError::validation(format!(
                "script does not match the `{variable} = {{...}};` module template"
            ))
        })?;

    serde_json::from_str(json)
        .map_err(|e| MenuforgeError::validation(format!("invalid menu JSON: {e}")))
}

fn read_index(output_dir: &Path, file: &str) -> Result<ArticleIndex> {
    let path = output_dir.join(file);
    let content = std::fs::read_to_string(&path).map_err(|e| MenuforgeError::io(&path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| MenuforgeError::validation(format!("invalid article index {file}: {e}")))
}
