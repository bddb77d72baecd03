//! Client-local list filters.
//!
//! Filters are never sent to the remote service. The sentiment dimension is
//! subordinate to the tag dimension: it only applies while a tag is
//! selected, and selecting a tag resets it to that tag's dominant sentiment.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::interview::InterviewStatus;
use crate::tag::{Sentiment, SentimentCounts};

/// Active filter state for a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Free-text search; blank means inactive.
    pub search: String,
    pub status: Option<InterviewStatus>,
    pub tag: Option<String>,
    pub sentiment: Option<Sentiment>,
}

/// A change to one filter dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Search(String),
    Status(Option<InterviewStatus>),
    Tag(Option<String>),
    Sentiment(Option<Sentiment>),
}

impl Filters {
    /// Search term normalized for matching, or `None` when inactive.
    pub fn search_term(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    /// Sentiment filter, only reported while a tag is selected.
    pub fn effective_sentiment(&self) -> Option<Sentiment> {
        self.tag.as_ref().and(self.sentiment)
    }

    /// Select (or clear) the tag filter.
    ///
    /// `counts` are the tag's aggregate sentiment counts; the sentiment
    /// filter is reset to their dominant sentiment, or cleared when the tag
    /// is cleared or unknown.
    pub fn select_tag(&mut self, tag: Option<String>, counts: Option<SentimentCounts>) {
        self.sentiment = match (&tag, counts) {
            (Some(_), Some(counts)) => Some(counts.dominant()),
            _ => None,
        };
        self.tag = tag;
    }

    /// Set the sentiment filter. Rejected when no tag is selected.
    pub fn select_sentiment(&mut self, sentiment: Option<Sentiment>) -> Result<(), StoreError> {
        if sentiment.is_some() && self.tag.is_none() {
            return Err(StoreError::SentimentWithoutTag);
        }
        self.sentiment = sentiment;
        Ok(())
    }
}
