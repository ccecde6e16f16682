use serde::{Deserialize, Serialize};

use super::{Channel, Identified};

/// A scrape target owned by exactly one channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub channel_id: i64,
    pub source_url: String,
    pub parse_media: bool,
    pub forbidden_words: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSource {
    pub channel_id: i64,
    pub source_url: String,
    pub parse_media: bool,
    pub forbidden_words: Vec<String>,
}

impl Source {
    /// Word filter in effect for this source: the owning channel's words
    /// followed by the source's own, duplicates removed.
    pub fn effective_forbidden_words(&self, channel: &Channel) -> Vec<String> {
        let mut merged = channel.forbidden_words.clone();
        for word in &self.forbidden_words {
            if !merged.contains(word) {
                merged.push(word.clone());
            }
        }
        merged
    }
}

impl Identified for Source {
    fn id(&self) -> i64 {
        self.id
    }
}
