use std::fmt;

mod channel;
mod site;
mod source;

pub use channel::{Channel, NewChannel};
pub use site::{NewSite, Site, SiteType};
pub use source::{NewSource, Source};

/// The three entity kinds held by the store, in parent order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Channel,
    Source,
    Site,
}

impl EntityKind {
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Channel => "channels",
            EntityKind::Source => "sources",
            EntityKind::Site => "sites",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Channel => "channel",
            EntityKind::Source => "source",
            EntityKind::Site => "site",
        };
        f.write_str(name)
    }
}

/// Anything persisted under an auto-assigned row id.
pub trait Identified {
    fn id(&self) -> i64;
}

pub fn find_by_id<T: Identified>(rows: &[T], id: i64) -> Option<&T> {
    rows.iter().find(|row| row.id() == id)
}
