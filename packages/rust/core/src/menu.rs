//! Menu assembly.
//!
//! Builds the complete menu in memory: one `modal` entry per article folder,
//! a spacer, then the flattened CSV link lists. Nothing is written here.

use std::path::Path;

use tracing::{debug, instrument};

use menuforge_links::flatten_links;
use menuforge_scanner::{Listing, index_articles};
use menuforge_shared::{ArticleIndex, ListingOrder, MenuBuilder, MenuItem, MenuMap, Result};

use crate::pipeline::ProgressReporter;

/// An article folder and the index file that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFolder {
    /// Folder name inside the working directory.
    pub subdirectory: String,
    /// Output file name (`<subdirectory>.json`).
    pub file_name: String,
    /// Markdown files found in the folder.
    pub index: ArticleIndex,
}

/// In-memory result of menu assembly, ready to be written.
#[derive(Debug, Clone)]
pub struct AssembledMenu {
    /// The ordered menu.
    pub menu: MenuMap,
    /// Article folders in menu order.
    pub folders: Vec<ArticleFolder>,
    /// Number of `link` entries in the menu.
    pub link_count: usize,
}

/// Assemble the menu for a scanned working directory.
#[instrument(skip_all, fields(
    dir = %working_dir.display(),
    folders = listing.subdirectories.len(),
    csv_files = listing.csv_files.len(),
))]
pub fn assemble_menu(
    working_dir: &Path,
    listing: &Listing,
    order: ListingOrder,
    progress: &dyn ProgressReporter,
) -> Result<AssembledMenu> {
    let mut builder = MenuBuilder::new();
    let mut folders = Vec::with_capacity(listing.subdirectories.len());

    for subdirectory in &listing.subdirectories {
        let file_name = index_file_name(subdirectory);
        builder.push(MenuItem::modal(display_name(subdirectory), file_name.clone()));

        let index = index_articles(subdirectory, working_dir, order)?;
        progress.folder_indexed(subdirectory, index.len());

        folders.push(ArticleFolder {
            subdirectory: subdirectory.clone(),
            file_name,
            index,
        });
    }

    builder.push(MenuItem::Spacer);

    let links_start = builder.next_key().index();
    let next = flatten_links(&listing.csv_files, working_dir, &mut builder)?;
    let link_count = next - links_start - listing.csv_files.len();
    progress.links_flattened(listing.csv_files.len(), link_count);

    let menu = builder.finish();
    debug!(items = menu.len(), link_count, "menu assembled");

    Ok(AssembledMenu {
        menu,
        folders,
        link_count,
    })
}

/// Menu label for a folder: first character upper-cased, rest unchanged.
pub fn display_name(subdirectory: &str) -> String {
    let mut chars = subdirectory.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Article index file name for a folder.
pub fn index_file_name(subdirectory: &str) -> String {
    format!("{subdirectory}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    use menuforge_shared::MenuKey;

    use crate::pipeline::SilentProgress;

    #[test]
    fn display_name_capitalizes_first_character_only() {
        assert_eq!(display_name("blog"), "Blog");
        assert_eq!(display_name("Blog"), "Blog");
        assert_eq!(display_name("bLOG"), "BLOG");
        assert_eq!(display_name("écrits"), "Écrits");
        assert_eq!(display_name("2024-notes"), "2024-notes");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn empty_listing_yields_single_spacer() {
        let tmp = tempfile::tempdir().unwrap();
        let assembled =
            assemble_menu(tmp.path(), &Listing::default(), ListingOrder::Filesystem, &SilentProgress)
                .unwrap();

        assert_eq!(assembled.menu.len(), 1);
        assert_eq!(assembled.menu.get(MenuKey(0)), Some(&MenuItem::Spacer));
        assert!(assembled.folders.is_empty());
        assert_eq!(assembled.link_count, 0);
    }

    #[test]
    fn modals_then_spacer_then_links() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::create_dir(root.join("blog")).unwrap();
        std::fs::write(root.join("blog/hello.md"), "# Hello").unwrap();
        std::fs::create_dir(root.join("Projects")).unwrap();
        std::fs::write(root.join("friends.csv"), "a,b\nAda,http://ada\n").unwrap();

        let listing = Listing {
            csv_files: vec!["friends.csv".into()],
            subdirectories: vec!["blog".into(), "Projects".into()],
        };
        let assembled =
            assemble_menu(root, &listing, ListingOrder::Filesystem, &SilentProgress).unwrap();
        let menu = &assembled.menu;

        assert_eq!(menu.get(MenuKey(0)), Some(&MenuItem::modal("Blog", "blog.json")));
        assert_eq!(
            menu.get(MenuKey(1)),
            Some(&MenuItem::modal("Projects", "Projects.json"))
        );
        assert_eq!(menu.get(MenuKey(2)), Some(&MenuItem::Spacer));
        assert_eq!(menu.get(MenuKey(3)), Some(&MenuItem::link("Ada", "http://ada")));
        assert_eq!(menu.get(MenuKey(4)), Some(&MenuItem::Spacer));
        assert!(menu.is_contiguous());

        assert_eq!(assembled.link_count, 1);
        assert_eq!(assembled.folders[0].file_name, "blog.json");
        assert_eq!(assembled.folders[0].index.len(), 1);
        assert!(assembled.folders[1].index.is_empty());
    }

    #[test]
    fn keys_stay_numeric_past_ten() {
        let tmp = tempfile::tempdir().unwrap();
        let rows: String = (0..12).map(|i| format!("Site {i},http://{i}\n")).collect();
        std::fs::write(tmp.path().join("many.csv"), format!("name,href\n{rows}")).unwrap();

        let listing = Listing {
            csv_files: vec!["many.csv".into()],
            subdirectories: vec![],
        };
        let assembled =
            assemble_menu(tmp.path(), &listing, ListingOrder::Filesystem, &SilentProgress).unwrap();

        let keys: Vec<usize> = assembled.menu.iter().map(|(k, _)| k.index()).collect();
        assert_eq!(keys, (0..14).collect::<Vec<_>>());
        assert_eq!(
            assembled.menu.get(MenuKey(10)),
            Some(&MenuItem::link("Site 9", "http://9"))
        );
    }
}
