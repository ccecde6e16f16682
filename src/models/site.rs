use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::Identified;

/// A pollable endpoint owned by exactly one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    /// Id of the owning source.
    pub parent_id: i64,
    pub site_url: String,
    pub site_type: SiteType,
}

#[derive(Debug, Clone)]
pub struct NewSite {
    pub parent_id: i64,
    pub site_url: String,
    pub site_type: SiteType,
}

/// Listing category of a site. Stored as its literal upper-case string;
/// anything outside this set is rejected at the storage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SiteType {
    Auto,
    Rent,
    Buy,
    Free,
}

impl SiteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteType::Auto => "AUTO",
            SiteType::Rent => "RENT",
            SiteType::Buy => "BUY",
            SiteType::Free => "FREE",
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTO" => Ok(SiteType::Auto),
            "RENT" => Ok(SiteType::Rent),
            "BUY" => Ok(SiteType::Buy),
            "FREE" => Ok(SiteType::Free),
            other => Err(AppError::InvalidEnum {
                value: other.to_string(),
            }),
        }
    }
}

impl Identified for Site {
    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_member() {
        for (text, expected) in [
            ("AUTO", SiteType::Auto),
            ("RENT", SiteType::Rent),
            ("BUY", SiteType::Buy),
            ("FREE", SiteType::Free),
        ] {
            assert_eq!(text.parse::<SiteType>().unwrap(), expected);
            assert_eq!(expected.as_str(), text);
        }
    }

    #[test]
    fn rejects_values_outside_the_set() {
        for bad in ["LEASE", "auto", "", "AUTO "] {
            let err = bad.parse::<SiteType>().unwrap_err();
            assert!(matches!(err, AppError::InvalidEnum { value } if value == bad));
        }
    }
}
