//! Storage core for operator-editable content-distribution configuration.
//!
//! Three entity kinds form a strict parent chain (a channel is fed by
//! sources, each source polls sites), persisted in SQLite with cascading
//! deletes enforced at the storage layer. List and boolean fields are
//! encoded into flat cells and decoded back on read; the [`ConfigStore`]
//! CRUD surface is the entire contract. Front ends (the bundled CLI or any
//! automation) collect raw input, split delimited text into list values,
//! and format decoded values for display.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use config::Config;
pub use db::ConfigStore;
pub use error::{AppError, Result};
pub use models::{
    find_by_id, Channel, EntityKind, Identified, NewChannel, NewSite, NewSource, Site, SiteType,
    Source,
};
