//! # Content Model
//!
//! Folio manages three kinds of content, each persisted as a JSON array in its
//! own catalog file. The field names are the ones the site templates read, so
//! they must not change:
//!
//! | Kind    | Catalog            | Asset field | Timestamp              |
//! |---------|--------------------|-------------|------------------------|
//! | `photo` | `photography.json` | `url`       | `date_added` (`%Y-%m-%d`)   |
//! | `chess` | `chess.json`       | `image_url` | `date` (`%B %d, %Y`)        |
//! | `anime` | `anime.json`       | `cover_url` | none                   |
//!
//! Anime entries written by older tooling carry no `id`; it is optional on load
//! and assigned to every new entry.
//!
//! Keys folio does not know about (added by hand or by other tools) are kept in
//! each record's `extra` map and written back unchanged on every save.
//!
//! ## Drafts
//!
//! A draft is what the presentation layer fills in: the free-text fields of a
//! record without the id, timestamp or asset URL. [`Draft::validated`] applies
//! the form rules (required fields, rating range) and [`Draft::into_record`]
//! turns it into the persisted record once the core has an id and a URL.

use crate::error::{FolioError, Result};
use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const PHOTO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const CHESS_DATE_FORMAT: &str = "%B %d, %Y";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Photo,
    Chess,
    Anime,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Photo, ContentKind::Chess, ContentKind::Anime];

    /// Catalog file name inside the data directory.
    pub fn catalog_file(&self) -> &'static str {
        match self {
            ContentKind::Photo => "photography.json",
            ContentKind::Chess => "chess.json",
            ContentKind::Anime => "anime.json",
        }
    }

    /// Prefix namespacing asset file names in the shared asset directory.
    pub fn asset_prefix(&self) -> &'static str {
        match self {
            ContentKind::Chess => "chess-",
            ContentKind::Photo | ContentKind::Anime => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Photo => "photo",
            ContentKind::Chess => "chess post",
            ContentKind::Anime => "anime entry",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Photo => "photo",
            ContentKind::Chess => "chess",
            ContentKind::Anime => "anime",
        };
        f.write_str(name)
    }
}

impl FromStr for ContentKind {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "photo" | "photos" | "photography" => Ok(ContentKind::Photo),
            "chess" => Ok(ContentKind::Chess),
            "anime" => Ok(ContentKind::Anime),
            other => Err(FolioError::Api(format!("Unknown content kind: {}", other))),
        }
    }
}

/// A persisted catalog entry.
pub trait CatalogRecord: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const KIND: ContentKind;

    fn id(&self) -> Option<u64>;
    fn title(&self) -> &str;

    /// Store-relative asset path, empty when no asset is attached.
    fn asset_url(&self) -> &str;

    /// Human-readable creation date, for kinds that record one.
    fn date(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub date_added: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogRecord for Photo {
    const KIND: ContentKind = ContentKind::Photo;

    fn id(&self) -> Option<u64> {
        Some(self.id)
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn asset_url(&self) -> &str {
        &self.url
    }

    fn date(&self) -> Option<&str> {
        Some(&self.date_added)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessPost {
    pub id: u64,
    pub title: String,
    pub date: String,
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogRecord for ChessPost {
    const KIND: ContentKind = ContentKind::Chess;

    fn id(&self) -> Option<u64> {
        Some(self.id)
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn asset_url(&self) -> &str {
        &self.image_url
    }

    fn date(&self) -> Option<&str> {
        Some(&self.date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimeType {
    #[default]
    Anime,
    Manga,
}

impl fmt::Display for AnimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimeType::Anime => f.write_str("Anime"),
            AnimeType::Manga => f.write_str("Manga"),
        }
    }
}

impl FromStr for AnimeType {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "anime" => Ok(AnimeType::Anime),
            "manga" => Ok(AnimeType::Manga),
            other => Err(FolioError::InvalidField {
                field: "type",
                reason: format!("expected Anime or Manga, got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AnimeType,
    pub rating: u8,
    pub cover_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogRecord for AnimeEntry {
    const KIND: ContentKind = ContentKind::Anime;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn asset_url(&self) -> &str {
        &self.cover_url
    }
}

/// Field values collected by a form, before the core fills in id, url and date.
pub trait Draft: Sized {
    type Record: CatalogRecord;

    /// Whether a save without a staged asset is allowed.
    const REQUIRES_ASSET: bool;

    fn title(&self) -> &str;

    /// Trim fields and apply the form's required-field rules.
    fn validated(self) -> Result<Self>;

    fn into_record(self, id: u64, asset_url: String, now: DateTime<Local>) -> Self::Record;
}

fn required(value: String, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FolioError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoDraft {
    pub title: String,
    pub location: String,
    pub description: String,
}

impl Draft for PhotoDraft {
    type Record = Photo;
    const REQUIRES_ASSET: bool = true;

    fn title(&self) -> &str {
        &self.title
    }

    fn validated(self) -> Result<Self> {
        Ok(Self {
            title: required(self.title, "title")?,
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }

    fn into_record(self, id: u64, asset_url: String, now: DateTime<Local>) -> Photo {
        Photo {
            id,
            url: asset_url,
            title: self.title,
            location: self.location,
            description: self.description,
            date_added: now.format(PHOTO_DATE_FORMAT).to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChessDraft {
    pub title: String,
    pub content: String,
}

impl Draft for ChessDraft {
    type Record = ChessPost;
    const REQUIRES_ASSET: bool = false;

    fn title(&self) -> &str {
        &self.title
    }

    fn validated(self) -> Result<Self> {
        Ok(Self {
            title: required(self.title, "title")?,
            content: required(self.content, "content")?,
        })
    }

    fn into_record(self, id: u64, asset_url: String, now: DateTime<Local>) -> ChessPost {
        ChessPost {
            id,
            title: self.title,
            date: now.format(CHESS_DATE_FORMAT).to_string(),
            content: self.content,
            image_url: asset_url,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeDraft {
    pub title: String,
    pub kind: AnimeType,
    pub rating: u8,
    pub description: String,
}

impl Default for AnimeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            kind: AnimeType::Anime,
            rating: MAX_RATING,
            description: String::new(),
        }
    }
}

impl Draft for AnimeDraft {
    type Record = AnimeEntry;
    const REQUIRES_ASSET: bool = true;

    fn title(&self) -> &str {
        &self.title
    }

    fn validated(self) -> Result<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(FolioError::InvalidField {
                field: "rating",
                reason: format!(
                    "{} is outside {}-{}",
                    self.rating, MIN_RATING, MAX_RATING
                ),
            });
        }
        Ok(Self {
            title: required(self.title, "title")?,
            kind: self.kind,
            rating: self.rating,
            description: self.description.trim().to_string(),
        })
    }

    fn into_record(self, id: u64, asset_url: String, _now: DateTime<Local>) -> AnimeEntry {
        AnimeEntry {
            id: Some(id),
            title: self.title,
            kind: self.kind,
            rating: self.rating,
            cover_url: asset_url,
            description: self.description,
            extra: Map::new(),
        }
    }
}
