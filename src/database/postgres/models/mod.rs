
use serde::{Deserialize, Serialize};

/// A movie record as it appears in the source dataset (`plots.json`).
///
/// Field names follow the upstream Wikipedia movie-plots dump; `Cast` is
/// missing for a fair number of entries.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceMovie {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Release Year")]
    pub year: i32,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Cast")]
    pub cast: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Wiki Page")]
    pub wiki: String,
}

/// A stored movie record with its derived plot embedding.
///
/// `wiki` is the stable identity: inserts upsert by it, so re-running
/// ingestion over the same dataset is idempotent. The embedding never goes
/// out in serialized responses; callers get the scalar columns.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Movie {
    pub title: String,
    pub director: String,
    pub plot: String,
    pub year: i32,
    pub wiki: String,
    pub cast: Option<String>,
    pub genre: String,
    #[serde(skip_serializing)]
    pub embedding: Vec<f32>,
}

impl SourceMovie {
    /// Boundary validation for ingestion. The plot feeds the embedding model
    /// and the wiki URL is the upsert key, so neither may be blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title must not be empty".to_string());
        }
        if self.plot.trim().is_empty() {
            return Err("Plot must not be empty".to_string());
        }
        if self.wiki.trim().is_empty() {
            return Err("Wiki Page must not be empty".to_string());
        }
        Ok(())
    }

    /// Attach the derived embedding, producing the storable record.
    pub fn into_movie(self, embedding: Vec<f32>) -> Movie {
        Movie {
            title: self.title,
            director: self.director,
            plot: self.plot,
            year: self.year,
            wiki: self.wiki,
            cast: self.cast,
            genre: self.genre,
            embedding,
        }
    }
}
