//! Sentiment-classified tags attached to interviews and responses.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Sentiment category of a tag mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(format!("invalid sentiment: '{other}'")),
        }
    }
}

/// Per-sentiment mention counts for a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(default)]
    pub positive: u32,
    #[serde(default)]
    pub negative: u32,
    #[serde(default)]
    pub neutral: u32,
}

impl SentimentCounts {
    pub fn new(positive: u32, negative: u32, neutral: u32) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// Count recorded for one sentiment.
    pub fn get(&self, sentiment: Sentiment) -> u32 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    /// The sentiment with the highest count.
    ///
    /// Exact ties resolve in priority order positive, negative, neutral, so
    /// an all-zero tag is reported as positive.
    pub fn dominant(&self) -> Sentiment {
        if self.positive >= self.negative && self.positive >= self.neutral {
            Sentiment::Positive
        } else if self.negative >= self.neutral {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Element-wise sum, used to aggregate one tag across several entities.
    pub fn merged(self, other: SentimentCounts) -> SentimentCounts {
        SentimentCounts {
            positive: self.positive.saturating_add(other.positive),
            negative: self.negative.saturating_add(other.negative),
            neutral: self.neutral.saturating_add(other.neutral),
        }
    }
}

/// A named tag with its sentiment breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(flatten)]
    pub counts: SentimentCounts,
}

impl Tag {
    pub fn new(name: impl Into<String>, counts: SentimentCounts) -> Self {
        Self {
            name: name.into(),
            counts,
        }
    }
}

/// Sum the counts of every tag named `name` across a set of tag lists.
///
/// Returns `None` when no list carries the tag.
pub fn aggregate_counts<'a, I>(tag_lists: I, name: &str) -> Option<SentimentCounts>
where
    I: IntoIterator<Item = &'a [Tag]>,
{
    tag_lists
        .into_iter()
        .flat_map(|tags| tags.iter())
        .filter(|tag| tag.name == name)
        .map(|tag| tag.counts)
        .reduce(SentimentCounts::merged)
}
