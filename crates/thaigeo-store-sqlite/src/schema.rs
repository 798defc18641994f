//! SQL schema for the geography SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS provinces (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT NOT NULL UNIQUE,   -- canonical, 2 digits
    name_th     TEXT NOT NULL DEFAULT '',
    name_en     TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL           -- RFC 3339 UTC
);

-- District codes are unique nationally, not just within a province.
-- province_id is NULL only for rows left behind by an interrupted import.
CREATE TABLE IF NOT EXISTS districts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT NOT NULL UNIQUE,   -- canonical, 4 digits
    name_th     TEXT NOT NULL DEFAULT '',
    name_en     TEXT NOT NULL DEFAULT '',
    province_id INTEGER REFERENCES provinces(id) ON UPDATE CASCADE ON DELETE RESTRICT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subdistricts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT NOT NULL UNIQUE,   -- canonical, 6 digits
    name_th     TEXT NOT NULL DEFAULT '',
    name_en     TEXT NOT NULL DEFAULT '',
    postal_code TEXT NOT NULL DEFAULT '',  -- 5 digits or empty
    district_id INTEGER REFERENCES districts(id) ON UPDATE CASCADE ON DELETE RESTRICT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS districts_province_idx    ON districts(province_id);
CREATE INDEX IF NOT EXISTS subdistricts_district_idx ON subdistricts(district_id);

PRAGMA user_version = 1;
";
