use serde::{Deserialize, Serialize};

use super::Identified;

/// A distribution destination with its own posting schedule and word filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub post_times: Vec<String>,
    pub forbidden_words: Vec<String>,
}

/// Input record for create and update; the store assigns the id.
#[derive(Debug, Clone, Default)]
pub struct NewChannel {
    pub name: String,
    pub url: String,
    pub post_times: Vec<String>,
    pub forbidden_words: Vec<String>,
}

impl Identified for Channel {
    fn id(&self) -> i64 {
        self.id
    }
}
