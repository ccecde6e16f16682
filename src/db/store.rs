use std::path::Path;

use rusqlite::{params, Connection, Row};

use crate::error::{AppError, Result};
use crate::models::{
    Channel, EntityKind, NewChannel, NewSite, NewSource, Site, SiteType, Source,
};

use super::codec;
use super::schema::SCHEMA;

/// Owns the single SQLite connection for the process lifetime.
///
/// Every operation is synchronous and blocks until the engine acknowledges
/// it. The store performs no retries: a concurrent external writer can
/// surface [`AppError::LockContention`], which the caller may retry with
/// backoff.
#[derive(Debug)]
pub struct ConfigStore {
    conn: Connection,
}

impl ConfigStore {
    /// Opens or creates the database at `path` and ensures the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// In-memory database with the same schema (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // SQLite leaves foreign_keys off on every new connection; without
        // it the ON DELETE CASCADE declarations are inert.
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        tracing::debug!("schema ensured");
        Ok(())
    }

    /// Releases the connection. Dropping the store does the same; this
    /// form reports close-time errors instead of discarding them.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    // Channel operations

    pub fn list_channels(&self) -> Result<Vec<Channel>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, url, post_times, forbidden_words FROM channels")?;
        let channels = stmt
            .query_map([], channel_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(channels)
    }

    pub fn create_channel(&self, channel: NewChannel) -> Result<i64> {
        require("name", &channel.name)?;
        require("url", &channel.url)?;
        let post_times = codec::encode_list(&channel.post_times)?;
        let forbidden_words = codec::encode_list(&channel.forbidden_words)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO channels (name, url, post_times, forbidden_words) VALUES (?1, ?2, ?3, ?4)",
            params![channel.name, channel.url, post_times, forbidden_words],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Full-record replace of the channel identified by `id`.
    pub fn update_channel(&self, id: i64, channel: NewChannel) -> Result<()> {
        require("name", &channel.name)?;
        require("url", &channel.url)?;
        let post_times = codec::encode_list(&channel.post_times)?;
        let forbidden_words = codec::encode_list(&channel.forbidden_words)?;
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE channels SET name = ?1, url = ?2, post_times = ?3, forbidden_words = ?4 WHERE id = ?5",
            params![channel.name, channel.url, post_times, forbidden_words, id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound {
                entity: EntityKind::Channel,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    // Source operations

    pub fn list_sources(&self) -> Result<Vec<Source>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, channel_id, source_url, parse_media, forbidden_words FROM sources",
        )?;
        let sources = stmt
            .query_map([], source_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sources)
    }

    pub fn create_source(&self, source: NewSource) -> Result<i64> {
        require("source_url", &source.source_url)?;
        let forbidden_words = codec::encode_list(&source.forbidden_words)?;
        let tx = self.conn.unchecked_transaction()?;
        require_parent(&tx, EntityKind::Channel, source.channel_id)?;
        tx.execute(
            "INSERT INTO sources (channel_id, source_url, parse_media, forbidden_words) VALUES (?1, ?2, ?3, ?4)",
            params![
                source.channel_id,
                source.source_url,
                codec::encode_bool(source.parse_media),
                forbidden_words
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    pub fn update_source(&self, id: i64, source: NewSource) -> Result<()> {
        require("source_url", &source.source_url)?;
        let forbidden_words = codec::encode_list(&source.forbidden_words)?;
        let tx = self.conn.unchecked_transaction()?;
        require_parent(&tx, EntityKind::Channel, source.channel_id)?;
        let changed = tx.execute(
            "UPDATE sources SET channel_id = ?1, source_url = ?2, parse_media = ?3, forbidden_words = ?4 WHERE id = ?5",
            params![
                source.channel_id,
                source.source_url,
                codec::encode_bool(source.parse_media),
                forbidden_words,
                id
            ],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound {
                entity: EntityKind::Source,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    // Site operations

    pub fn list_sites(&self) -> Result<Vec<Site>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, parent_id, site_url, site_type FROM sites")?;
        let sites = stmt
            .query_map([], site_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sites)
    }

    pub fn create_site(&self, site: NewSite) -> Result<i64> {
        require("site_url", &site.site_url)?;
        let tx = self.conn.unchecked_transaction()?;
        require_parent(&tx, EntityKind::Source, site.parent_id)?;
        tx.execute(
            "INSERT INTO sites (parent_id, site_url, site_type) VALUES (?1, ?2, ?3)",
            params![site.parent_id, site.site_url, site.site_type.as_str()],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    pub fn update_site(&self, id: i64, site: NewSite) -> Result<()> {
        require("site_url", &site.site_url)?;
        let tx = self.conn.unchecked_transaction()?;
        require_parent(&tx, EntityKind::Source, site.parent_id)?;
        let changed = tx.execute(
            "UPDATE sites SET parent_id = ?1, site_url = ?2, site_type = ?3 WHERE id = ?4",
            params![site.parent_id, site.site_url, site.site_type.as_str(), id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound {
                entity: EntityKind::Site,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    /// Removes a row of any kind. Dependent children go with it through the
    /// cascade declarations; deleting the same id twice reports the second
    /// call as [`AppError::NotFound`].
    pub fn delete(&self, kind: EntityKind, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
        let changed = tx.execute(&sql, params![id])?;
        if changed == 0 {
            return Err(AppError::NotFound { entity: kind, id });
        }
        tx.commit()?;
        tracing::debug!("deleted {} {}", kind, id);
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::EmptyField { field });
    }
    Ok(())
}

fn require_parent(conn: &Connection, parent: EntityKind, id: i64) -> Result<()> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)",
        parent.table()
    );
    let exists: bool = conn.query_row(&sql, params![id], |row| row.get(0))?;
    if !exists {
        return Err(AppError::ForeignKeyViolation { parent, id });
    }
    Ok(())
}

fn channel_from_row(row: &Row) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        post_times: list_column(row, 3)?,
        forbidden_words: list_column(row, 4)?,
    })
}

fn source_from_row(row: &Row) -> rusqlite::Result<Source> {
    Ok(Source {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        source_url: row.get(2)?,
        parse_media: codec::decode_bool(row.get(3)?),
        forbidden_words: list_column(row, 4)?,
    })
}

fn site_from_row(row: &Row) -> rusqlite::Result<Site> {
    let raw_type: String = row.get(3)?;
    let site_type = raw_type.parse::<SiteType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Site {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        site_url: row.get(2)?,
        site_type,
    })
}

// Rows written before the encoder existed may hold NULL where it now
// writes "[]".
fn list_column(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let cell: Option<String> = row.get(idx)?;
    match cell {
        None => Ok(Vec::new()),
        Some(text) => codec::decode_list(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn news_channel() -> NewChannel {
        NewChannel {
            name: "news".into(),
            url: "https://x".into(),
            post_times: vec!["09:00".into(), "18:00".into()],
            forbidden_words: vec!["spam".into()],
        }
    }

    fn source_under(channel_id: i64) -> NewSource {
        NewSource {
            channel_id,
            source_url: "https://feed.example.org/rss".into(),
            parse_media: true,
            forbidden_words: vec!["casino".into()],
        }
    }

    fn site_under(parent_id: i64) -> NewSite {
        NewSite {
            parent_id,
            site_url: "https://listings.example.org".into(),
            site_type: SiteType::Rent,
        }
    }

    #[test]
    fn channel_create_list_delete_round_trip() {
        let store = ConfigStore::open_in_memory().unwrap();

        let id = store.create_channel(news_channel()).unwrap();
        assert!(id > 0);

        let channels = store.list_channels().unwrap();
        assert_eq!(channels.len(), 1);
        let channel = &channels[0];
        assert_eq!(channel.id, id);
        assert_eq!(channel.name, "news");
        assert_eq!(channel.url, "https://x");
        assert_eq!(channel.post_times, vec!["09:00", "18:00"]);
        assert_eq!(channel.forbidden_words, vec!["spam"]);

        store.delete(EntityKind::Channel, id).unwrap();
        assert!(store.list_channels().unwrap().is_empty());
    }

    #[test]
    fn empty_lists_round_trip() {
        let store = ConfigStore::open_in_memory().unwrap();
        let id = store
            .create_channel(NewChannel {
                name: "bare".into(),
                url: "https://bare".into(),
                post_times: vec![],
                forbidden_words: vec![],
            })
            .unwrap();
        let channels = store.list_channels().unwrap();
        assert_eq!(channels[0].id, id);
        assert!(channels[0].post_times.is_empty());
        assert!(channels[0].forbidden_words.is_empty());
    }

    #[test]
    fn duplicate_url_is_rejected_and_first_row_survives() {
        let store = ConfigStore::open_in_memory().unwrap();
        store.create_channel(news_channel()).unwrap();

        let err = store
            .create_channel(NewChannel {
                name: "other".into(),
                ..news_channel()
            })
            .unwrap_err();
        assert!(
            matches!(&err, AppError::UniqueConstraintViolation { field } if field == "channels.url")
        );

        let channels = store.list_channels().unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "news");
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let store = ConfigStore::open_in_memory().unwrap();
        store.create_channel(news_channel()).unwrap();

        let err = store
            .create_channel(NewChannel {
                url: "https://y".into(),
                ..news_channel()
            })
            .unwrap_err();
        assert!(
            matches!(&err, AppError::UniqueConstraintViolation { field } if field == "channels.name")
        );
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let store = ConfigStore::open_in_memory().unwrap();
        let err = store
            .create_channel(NewChannel {
                name: "  ".into(),
                ..news_channel()
            })
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyField { field: "name" }));
        assert!(store.list_channels().unwrap().is_empty());
    }

    #[test]
    fn source_requires_existing_channel() {
        let store = ConfigStore::open_in_memory().unwrap();
        let err = store.create_source(source_under(42)).unwrap_err();
        assert!(matches!(
            err,
            AppError::ForeignKeyViolation {
                parent: EntityKind::Channel,
                id: 42
            }
        ));
        assert!(store.list_sources().unwrap().is_empty());
    }

    #[test]
    fn site_requires_existing_source() {
        let store = ConfigStore::open_in_memory().unwrap();
        let err = store.create_site(site_under(7)).unwrap_err();
        assert!(matches!(
            err,
            AppError::ForeignKeyViolation {
                parent: EntityKind::Source,
                id: 7
            }
        ));
        assert!(store.list_sites().unwrap().is_empty());
    }

    #[test]
    fn source_fields_round_trip() {
        let store = ConfigStore::open_in_memory().unwrap();
        let channel_id = store.create_channel(news_channel()).unwrap();
        let id = store.create_source(source_under(channel_id)).unwrap();

        let sources = store.list_sources().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, id);
        assert_eq!(sources[0].channel_id, channel_id);
        assert!(sources[0].parse_media);
        assert_eq!(sources[0].forbidden_words, vec!["casino"]);
    }

    #[test]
    fn site_type_round_trips_for_every_member() {
        let store = ConfigStore::open_in_memory().unwrap();
        let channel_id = store.create_channel(news_channel()).unwrap();
        let parent_id = store.create_source(source_under(channel_id)).unwrap();

        for site_type in [SiteType::Auto, SiteType::Rent, SiteType::Buy, SiteType::Free] {
            let id = store
                .create_site(NewSite {
                    site_type,
                    ..site_under(parent_id)
                })
                .unwrap();
            let sites = store.list_sites().unwrap();
            let site = sites.iter().find(|s| s.id == id).unwrap();
            assert_eq!(site.site_type, site_type);
        }
    }

    #[test]
    fn deleting_channel_cascades_to_sources_and_sites() {
        let store = ConfigStore::open_in_memory().unwrap();
        let channel_id = store.create_channel(news_channel()).unwrap();
        let source_id = store.create_source(source_under(channel_id)).unwrap();
        store.create_site(site_under(source_id)).unwrap();

        store.delete(EntityKind::Channel, channel_id).unwrap();

        assert!(store.list_channels().unwrap().is_empty());
        assert!(store.list_sources().unwrap().is_empty());
        assert!(store.list_sites().unwrap().is_empty());
    }

    #[test]
    fn deleting_source_cascades_to_its_sites_only() {
        let store = ConfigStore::open_in_memory().unwrap();
        let channel_id = store.create_channel(news_channel()).unwrap();
        let kept = store.create_source(source_under(channel_id)).unwrap();
        let doomed = store
            .create_source(NewSource {
                source_url: "https://other.example.org/rss".into(),
                ..source_under(channel_id)
            })
            .unwrap();
        let kept_site = store.create_site(site_under(kept)).unwrap();
        store.create_site(site_under(doomed)).unwrap();

        store.delete(EntityKind::Source, doomed).unwrap();

        assert_eq!(store.list_channels().unwrap().len(), 1);
        let sites = store.list_sites().unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].id, kept_site);
    }

    #[test]
    fn update_replaces_the_whole_record() {
        let store = ConfigStore::open_in_memory().unwrap();
        let id = store.create_channel(news_channel()).unwrap();

        store
            .update_channel(
                id,
                NewChannel {
                    name: "digest".into(),
                    url: "https://y".into(),
                    post_times: vec!["12:00".into()],
                    forbidden_words: vec![],
                },
            )
            .unwrap();

        let channels = store.list_channels().unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "digest");
        assert_eq!(channels[0].url, "https://y");
        assert_eq!(channels[0].post_times, vec!["12:00"]);
        assert!(channels[0].forbidden_words.is_empty());
    }

    #[test]
    fn update_source_validates_new_parent() {
        let store = ConfigStore::open_in_memory().unwrap();
        let channel_id = store.create_channel(news_channel()).unwrap();
        let id = store.create_source(source_under(channel_id)).unwrap();

        let err = store
            .update_source(id, NewSource { channel_id: 99, ..source_under(channel_id) })
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ForeignKeyViolation {
                parent: EntityKind::Channel,
                id: 99
            }
        ));
        assert_eq!(store.list_sources().unwrap()[0].channel_id, channel_id);
    }

    #[test]
    fn missing_ids_surface_not_found_and_change_nothing() {
        let store = ConfigStore::open_in_memory().unwrap();
        store.create_channel(news_channel()).unwrap();

        let err = store.update_channel(999, news_channel()).unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound {
                entity: EntityKind::Channel,
                id: 999
            }
        ));

        let err = store.delete(EntityKind::Channel, 999).unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound {
                entity: EntityKind::Channel,
                id: 999
            }
        ));

        assert_eq!(store.list_channels().unwrap().len(), 1);
    }

    #[test]
    fn second_delete_of_same_id_is_not_found() {
        let store = ConfigStore::open_in_memory().unwrap();
        let id = store.create_channel(news_channel()).unwrap();

        store.delete(EntityKind::Channel, id).unwrap();
        let err = store.delete(EntityKind::Channel, id).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
