pub const SCHEMA: &str = r#"
-- channels table
CREATE TABLE IF NOT EXISTS channels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    url TEXT NOT NULL UNIQUE,
    post_times TEXT,
    forbidden_words TEXT
);

-- sources table
CREATE TABLE IF NOT EXISTS sources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    channel_id INTEGER NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
    source_url TEXT NOT NULL,
    parse_media INTEGER NOT NULL DEFAULT 0,
    forbidden_words TEXT
);

CREATE INDEX IF NOT EXISTS idx_sources_channel_id ON sources(channel_id);

-- sites table (parent_id references the owning source)
CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    parent_id INTEGER NOT NULL REFERENCES sources(id) ON DELETE CASCADE,
    site_url TEXT NOT NULL,
    site_type TEXT NOT NULL CHECK(site_type IN ('AUTO','RENT','BUY','FREE'))
);

CREATE INDEX IF NOT EXISTS idx_sites_parent_id ON sites(parent_id);
"#;
