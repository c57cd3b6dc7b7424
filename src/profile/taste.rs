//! Taste catalog types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One liked catalog item (a movie, artist or show).
///
/// Upstream payloads are dynamically shaped: an item arrives either as a
/// bare title string or as a full object. Deserialization normalizes both
/// into this single representation, so comparison logic downstream never
/// sees the raw shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TasteItem {
    pub id: String,
    pub title: String,
    pub genres: Vec<String>,
}

impl TasteItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            genres: Vec::new(),
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Builds an item from a bare title, deriving a slug id from it.
    pub fn from_title(title: &str) -> Self {
        Self {
            id: slugify(title),
            title: title.to_string(),
            genres: Vec::new(),
        }
    }
}

fn slugify(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTasteItem {
    Bare(String),
    Full {
        id: Option<String>,
        title: String,
        #[serde(default)]
        genres: Vec<String>,
    },
}

impl<'de> Deserialize<'de> for TasteItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match RawTasteItem::deserialize(deserializer)? {
            RawTasteItem::Bare(title) => Ok(TasteItem::from_title(&title)),
            RawTasteItem::Full { id, title, genres } => Ok(TasteItem {
                id: id.unwrap_or_else(|| slugify(&title)),
                title,
                genres,
            }),
        }
    }
}

/// Per-user taste catalog. One per user, mutated externally, read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasteProfile {
    pub user_id: Uuid,
    #[serde(default)]
    pub movies: Vec<TasteItem>,
    #[serde(default)]
    pub music: Vec<TasteItem>,
    #[serde(default)]
    pub shows: Vec<TasteItem>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub weights: super::CategoryWeights,
}

impl TasteProfile {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            movies: Vec::new(),
            music: Vec::new(),
            shows: Vec::new(),
            region: None,
            language: None,
            weights: super::CategoryWeights::default(),
        }
    }

    /// Returns `true` if all three catalog categories are empty.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.music.is_empty() && self.shows.is_empty()
    }
}
