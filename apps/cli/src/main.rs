//! menuforge CLI — builds the menu data for a static portfolio site.
//!
//! Turns a folder of CSV link lists and Markdown article folders into
//! per-folder article indexes and a `menu_items.js` module.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
