mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::TransactionRecord;

const RECORD_COLUMNS: &str = "id, user_id, month, item_name, category, amount, money_in, money_out, notes, created_at, updated_at";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying schema migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Records ───────────────────────────────────────────────

    pub(crate) fn insert_record(&self, record: &TransactionRecord) -> Result<i64> {
        insert_into(&self.conn, record)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert every record in one transaction; either all land or none do.
    pub(crate) fn insert_records_batch(&mut self, records: &[TransactionRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for record in records {
            insert_into(&tx, record)?;
        }
        tx.commit()?;
        tracing::debug!(count = records.len(), "inserted record batch");
        Ok(records.len())
    }

    /// A user's records, newest month first. `month` narrows to one month.
    pub(crate) fn get_records(
        &self,
        user_id: &str,
        month: Option<&str>,
    ) -> Result<Vec<TransactionRecord>> {
        let mut sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE user_id = ?1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(m) = month {
            sql.push_str(&format!(" AND month = ?{}", param_values.len() + 1));
            param_values.push(Box::new(m.to_string()));
        }

        sql.push_str(" ORDER BY month DESC, created_at DESC, id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), record_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_record(&self, user_id: &str, id: i64) -> Result<Option<TransactionRecord>> {
        let result = self.conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id],
            record_from_row,
        );
        match result {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite a stored record owned by `record.user_id`. Returns false when
    /// no such record exists for that user.
    pub(crate) fn update_record(&self, record: &TransactionRecord) -> Result<bool> {
        let id = record
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update a record that has no id"))?;
        let changed = self.conn.execute(
            "UPDATE records
             SET month = ?1, item_name = ?2, category = ?3, amount = ?4, money_in = ?5,
                 money_out = ?6, notes = ?7, updated_at = ?8
             WHERE id = ?9 AND user_id = ?10",
            params![
                record.month,
                record.item_name,
                record.category,
                record.amount.to_string(),
                record.money_in.to_string(),
                record.money_out.to_string(),
                record.notes,
                record.updated_at,
                id,
                record.user_id,
            ],
        )?;
        Ok(changed > 0)
    }

    pub(crate) fn delete_record(&self, user_id: &str, id: i64) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM records WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    /// Distinct months holding any of the user's records, newest first.
    pub(crate) fn get_months(&self, user_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT month FROM records WHERE user_id = ?1 ORDER BY month DESC")?;
        let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Categories ────────────────────────────────────────────

    /// Save a category name for the user. Returns false if it was already saved.
    pub(crate) fn insert_category(&self, user_id: &str, name: &str) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO user_categories (user_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, name, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    /// Saved categories plus every category already used on a record.
    pub(crate) fn get_categories(&self, user_id: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM user_categories WHERE user_id = ?1
             UNION
             SELECT category FROM records WHERE user_id = ?1 AND TRIM(category) != ''
             ORDER BY 1 COLLATE NOCASE",
        )?;
        let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn insert_into(conn: &Connection, record: &TransactionRecord) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO records (user_id, month, item_name, category, amount, money_in, money_out, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.user_id,
            record.month,
            record.item_name,
            record.category,
            record.amount.to_string(),
            record.money_in.to_string(),
            record.money_out.to_string(),
            record.notes,
            record.created_at,
            record.updated_at,
        ],
    )
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TransactionRecord> {
    let decimal = |idx: usize| -> rusqlite::Result<Decimal> {
        let text: String = row.get(idx)?;
        Ok(Decimal::from_str(&text).unwrap_or_default())
    };
    Ok(TransactionRecord {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        month: row.get(2)?,
        item_name: row.get(3)?,
        category: row.get(4)?,
        amount: decimal(5)?,
        money_in: decimal(6)?,
        money_out: decimal(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests;
