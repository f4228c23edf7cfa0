//! End-to-end `generate` pipeline: scan → index → flatten → assemble → write.
//!
//! Every input is read and the whole menu is assembled before the first
//! output is written, so a missing folder or malformed CSV leaves the output
//! directory untouched. A failure part-way through writing can still leave
//! earlier outputs of the same run on disk.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use menuforge_scanner::scan;
use menuforge_shared::{GenerateConfig, MenuMap, MenuforgeError, Result};

use crate::assembler::{WrittenFile, menu_json_name, write_outputs};
use crate::menu::{AssembledMenu, assemble_menu};

/// Result of a `generate` run.
#[derive(Debug)]
pub struct GenerateResult {
    /// Directory the outputs were written to.
    pub output_dir: PathBuf,
    /// The menu as written.
    pub menu: MenuMap,
    /// Number of article folders.
    pub folder_count: usize,
    /// Total Markdown files across all folders.
    pub article_count: usize,
    /// Number of `link` entries.
    pub link_count: usize,
    /// Every file written, in write order.
    pub files: Vec<WrittenFile>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after an article folder is indexed.
    fn folder_indexed(&self, subdirectory: &str, articles: usize);
    /// Called once all CSV files are flattened.
    fn links_flattened(&self, files: usize, links: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn folder_indexed(&self, _subdirectory: &str, _articles: usize) {}
    fn links_flattened(&self, _files: usize, _links: usize) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Run the full `generate` pipeline.
///
/// 1. Check input and output directories
/// 2. Scan the working directory
/// 3. Index article folders and flatten link lists
/// 4. Write article indexes and the script module
#[instrument(skip_all, fields(input = %config.input_dir.display(), output = %config.output_dir.display()))]
pub fn generate(config: &GenerateConfig, progress: &dyn ProgressReporter) -> Result<GenerateResult> {
    let start = Instant::now();

    progress.phase("Checking directories");
    if !config.input_dir.is_dir() {
        return Err(MenuforgeError::not_found(&config.input_dir));
    }
    let create_output = !config.output_dir.is_dir();
    if create_output && !config.create_output_dir {
        return Err(MenuforgeError::not_found(&config.output_dir));
    }

    progress.phase("Scanning");
    let listing = scan(&config.input_dir, config.order)?;
    info!(
        folders = listing.subdirectories.len(),
        csv_files = listing.csv_files.len(),
        "working directory scanned"
    );

    progress.phase("Assembling menu");
    let assembled = assemble_menu(&config.input_dir, &listing, config.order, progress)?;
    check_name_collisions(config, &assembled)?;

    progress.phase("Writing outputs");
    if create_output {
        std::fs::create_dir_all(&config.output_dir)
            .map_err(|e| MenuforgeError::io(&config.output_dir, e))?;
        info!(path = %config.output_dir.display(), "created output directory");
    }
    let files = write_outputs(config, &assembled)?;

    let result = GenerateResult {
        output_dir: config.output_dir.clone(),
        folder_count: assembled.folders.len(),
        article_count: assembled.folders.iter().map(|f| f.index.len()).sum(),
        link_count: assembled.link_count,
        menu: assembled.menu,
        files,
        elapsed: start.elapsed(),
    };

    info!(
        items = result.menu.len(),
        folders = result.folder_count,
        articles = result.article_count,
        links = result.link_count,
        "generate complete"
    );

    progress.done(&result);
    Ok(result)
}

/// An article index must not overwrite the script module or menu JSON.
fn check_name_collisions(config: &GenerateConfig, assembled: &AssembledMenu) -> Result<()> {
    let menu_json = menu_json_name(&config.variable);
    for folder in &assembled.folders {
        let clashes_json = config.emit_json && folder.file_name == menu_json;
        if folder.file_name == config.script_name || clashes_json {
            return Err(MenuforgeError::validation(format!(
                "article folder '{}' would overwrite {}",
                folder.subdirectory, folder.file_name
            )));
        }
    }
    Ok(())
}
