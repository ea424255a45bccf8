// ABOUTME: Data model for blocks, pages, database queries and bookmark fields.
// ABOUTME: External objects stay open JSON maps so unknown fields round-trip untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Block type tag of a bookmark block.
pub const BOOKMARK_TYPE: &str = "bookmark";

/// Block type tag of a synced block.
pub const SYNCED_BLOCK_TYPE: &str = "synced_block";

/// A content block together with its recursively fetched children.
///
/// Only the fields traversal relies on are typed. Everything else the API
/// returns (including the type-specific payload, e.g. `bookmark`) is kept in
/// `fields`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Children attached by traversal. Empty for leaves.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Block {
    /// Returns true if the block is an (unenriched) bookmark.
    pub fn is_bookmark(&self) -> bool {
        self.block_type == BOOKMARK_TYPE
    }

    /// The bookmark payload, if present.
    pub fn bookmark(&self) -> Option<&Map<String, Value>> {
        self.fields.get(BOOKMARK_TYPE).and_then(Value::as_object)
    }

    /// The bookmark's URL, if the payload has a non-empty one.
    pub fn bookmark_url(&self) -> Option<&str> {
        self.bookmark()
            .and_then(|b| b.get("url"))
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
    }

    /// The bookmark payload as a typed record. Extra payload keys are ignored.
    pub fn bookmark_field(&self) -> Option<BookmarkField> {
        self.fields
            .get(BOOKMARK_TYPE)
            .and_then(|b| serde_json::from_value(b.clone()).ok())
    }

    /// For a synced copy, the id of the block it mirrors.
    pub fn synced_source_id(&self) -> Option<&str> {
        if self.block_type != SYNCED_BLOCK_TYPE {
            return None;
        }
        self.fields
            .get(SYNCED_BLOCK_TYPE)
            .and_then(|s| s.get("synced_from"))
            .and_then(|f| f.get("block_id"))
            .and_then(Value::as_str)
    }

    /// The id whose children hold this block's content.
    pub fn children_source_id(&self) -> &str {
        self.synced_source_id().unwrap_or(&self.id)
    }
}

/// A page object as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Page {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A page merged with its full block tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FullPage {
    #[serde(flatten)]
    pub page: Page,
    pub blocks: Vec<Block>,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedList<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> PaginatedList<T> {
    /// Cursor for the next page, only when the API says there is one.
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Parameters of a database query. Filter, sorts and any other body fields
/// travel in `body`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DatabaseQuery {
    pub database_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl DatabaseQuery {
    pub fn new(database_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            ..Default::default()
        }
    }

    /// Copy of these parameters continuing from `cursor`.
    pub fn with_cursor(&self, cursor: impl Into<String>) -> Self {
        Self {
            start_cursor: Some(cursor.into()),
            ..self.clone()
        }
    }
}

/// Names of the fields of a bookmark payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BookmarkFieldKey {
    Title,
    Description,
    Url,
    Favicon,
    Image,
}

impl BookmarkFieldKey {
    pub const ALL: [BookmarkFieldKey; 5] = [
        BookmarkFieldKey::Title,
        BookmarkFieldKey::Description,
        BookmarkFieldKey::Url,
        BookmarkFieldKey::Favicon,
        BookmarkFieldKey::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkFieldKey::Title => "title",
            BookmarkFieldKey::Description => "description",
            BookmarkFieldKey::Url => "url",
            BookmarkFieldKey::Favicon => "favicon",
            BookmarkFieldKey::Image => "image",
        }
    }
}

impl fmt::Display for BookmarkFieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkFieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookmarkFieldKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown bookmark field: {s}"))
    }
}

/// Typed bookmark payload.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BookmarkField {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Link preview produced by the default parsers. Missing values are empty.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Metadata {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub favicon: String,
}

impl Metadata {
    /// Build from a parsed field map, ignoring keys that are not bookmark fields.
    pub fn from_fields(url: &str, fields: &Map<String, Value>) -> Self {
        let get = |key: BookmarkFieldKey| {
            fields
                .get(key.as_str())
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            url: url.to_string(),
            title: get(BookmarkFieldKey::Title),
            description: get(BookmarkFieldKey::Description),
            image: get(BookmarkFieldKey::Image),
            favicon: get(BookmarkFieldKey::Favicon),
        }
    }
}
