//! Core domain types for the generated menu and article indexes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MenuforgeError;

// ---------------------------------------------------------------------------
// Indexed keys
// ---------------------------------------------------------------------------

/// Parse `<prefix><n>` where `n` is a canonical decimal (no sign, no leading zeros).
fn parse_indexed(s: &str, prefix: &str) -> Option<usize> {
    let digits = s.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

macro_rules! indexed_key {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl $name {
            /// Literal text preceding the index.
            pub const PREFIX: &'static str = $prefix;

            /// The numeric suffix.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", Self::PREFIX, self.0)
            }
        }

        impl FromStr for $name {
            type Err = MenuforgeError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                parse_indexed(s, Self::PREFIX).map(Self).ok_or_else(|| {
                    MenuforgeError::validation(format!(
                        "invalid key '{s}': expected {}<n>",
                        Self::PREFIX
                    ))
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

indexed_key!(
    /// Synthetic menu key `item_<n>`, ordered by `n` rather than by text.
    MenuKey,
    "item_"
);

indexed_key!(
    /// Synthetic article key `article_<i>`.
    ArticleKey,
    "article_"
);

// ---------------------------------------------------------------------------
// MenuItem
// ---------------------------------------------------------------------------

/// One entry in the menu manifest.
///
/// Serialization writes fields in a fixed order: `name, file, group` for
/// modals and `group, name, href` for links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "group", rename_all = "lowercase")]
pub enum MenuItem {
    /// Points at a per-folder article index file.
    Modal { name: String, file: String },
    /// External link read from a CSV row.
    Link { name: String, href: String },
    /// Separator with no payload.
    Spacer,
}

impl MenuItem {
    pub fn modal(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self::Modal {
            name: name.into(),
            file: file.into(),
        }
    }

    pub fn link(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            name: name.into(),
            href: href.into(),
        }
    }

    /// The `group` tag written to JSON.
    pub fn group(&self) -> &'static str {
        match self {
            Self::Modal { .. } => "modal",
            Self::Link { .. } => "link",
            Self::Spacer => "spacer",
        }
    }
}

impl Serialize for MenuItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Modal { name, file } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("file", file)?;
                map.serialize_entry("group", self.group())?;
                map.end()
            }
            Self::Link { name, href } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("group", self.group())?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("href", href)?;
                map.end()
            }
            Self::Spacer => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("group", self.group())?;
                map.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MenuMap
// ---------------------------------------------------------------------------

/// Ordered `item_<n>` → [`MenuItem`] mapping.
///
/// Iteration and serialization always follow the numeric key order, whatever
/// order entries were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuMap {
    items: BTreeMap<MenuKey, MenuItem>,
}

impl MenuMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, returning any item previously stored under `key`.
    pub fn insert(&mut self, key: MenuKey, item: MenuItem) -> Option<MenuItem> {
        self.items.insert(key, item)
    }

    pub fn get(&self, key: MenuKey) -> Option<&MenuItem> {
        self.items.get(&key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MenuKey, &MenuItem)> {
        self.items.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.values()
    }

    /// Whether the keys are exactly `item_0..item_{len-1}`.
    pub fn is_contiguous(&self) -> bool {
        self.items.keys().enumerate().all(|(i, key)| key.0 == i)
    }
}

impl FromIterator<(MenuKey, MenuItem)> for MenuMap {
    fn from_iter<I: IntoIterator<Item = (MenuKey, MenuItem)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// MenuBuilder
// ---------------------------------------------------------------------------

/// Append-only list of menu items; keys are assigned when the list is finished.
#[derive(Debug, Clone, Default)]
pub struct MenuBuilder {
    start: usize,
    items: Vec<MenuItem>,
}

impl MenuBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start numbering at `start` instead of 0.
    pub fn starting_at(start: usize) -> Self {
        Self {
            start,
            items: Vec::new(),
        }
    }

    /// Append an item, returning the key it will receive.
    pub fn push(&mut self, item: MenuItem) -> MenuKey {
        let key = self.next_key();
        self.items.push(item);
        key
    }

    /// Key the next pushed item will receive.
    pub fn next_key(&self) -> MenuKey {
        MenuKey(self.start + self.items.len())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> MenuMap {
        let start = self.start;
        self.items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (MenuKey(start + i), item))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ArticleIndex
// ---------------------------------------------------------------------------

/// Ordered `article_<i>` → Markdown file name mapping for one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleIndex {
    files: Vec<String>,
}

impl ArticleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file_name: impl Into<String>) -> ArticleKey {
        self.files.push(file_name.into());
        ArticleKey(self.files.len() - 1)
    }

    pub fn get(&self, key: ArticleKey) -> Option<&str> {
        self.files.get(key.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArticleKey, &str)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (ArticleKey(i), f.as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for ArticleIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Serialize for ArticleIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for (key, file) in self.iter() {
            map.serialize_entry(&key, file)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ArticleIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<ArticleKey, String>::deserialize(deserializer)?;
        if let Some((i, key)) = raw.keys().enumerate().find(|(i, key)| key.0 != *i) {
            return Err(serde::de::Error::custom(format!(
                "article keys are not contiguous: expected {}, found {key}",
                ArticleKey(i)
            )));
        }
        Ok(raw.into_values().collect())
    }
}
