pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL,
    month       TEXT NOT NULL,
    item_name   TEXT NOT NULL DEFAULT '',
    category    TEXT NOT NULL DEFAULT '',
    amount      TEXT NOT NULL DEFAULT '0',
    money_in    TEXT NOT NULL DEFAULT '0',
    money_out   TEXT NOT NULL DEFAULT '0',
    notes       TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_user_month ON records(user_id, month);

CREATE TABLE IF NOT EXISTS user_categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    UNIQUE(user_id, name)
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
