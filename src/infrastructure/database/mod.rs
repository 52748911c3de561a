//! SQLite persistence for the picture gallery

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::entities::{ImageRecord, NewImage, TagRecord};
use crate::domain::traits::ImageStore;

/// SQLite-backed image store
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(db_err)?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_tables()?;
        Ok(db)
    }

    fn init_tables(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS picar_images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tag TEXT NOT NULL,
                img_url TEXT NOT NULL,
                uploader TEXT NOT NULL DEFAULT '',
                uploaderId INTEGER NOT NULL DEFAULT 0,
                upload_time TEXT NOT NULL
            )",
            [],
        )
        .map_err(db_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS picar_tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tag TEXT UNIQUE NOT NULL
            )",
            [],
        )
        .map_err(db_err)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_picar_images_tag ON picar_images(tag)",
            [],
        )
        .map_err(db_err)?;

        Ok(())
    }
}

impl ImageStore for Database {
    fn add_image(&self, image: &NewImage) -> Result<i64, StorageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO picar_images (tag, img_url, uploader, uploaderId, upload_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                image.tag,
                image.img_url,
                image.uploader,
                image.uploader_id,
                image.upload_time.to_rfc3339(),
            ],
        )
        .map_err(db_err)?;
        Ok(conn.last_insert_rowid())
    }

    fn images_by_tag(&self, tag: Option<&str>) -> Result<Vec<ImageRecord>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let (sql, params) = match tag {
            Some(tag) => (
                "SELECT id, tag, img_url, uploader, uploaderId, upload_time
                 FROM picar_images WHERE tag = ?1 ORDER BY id",
                vec![tag.to_string()],
            ),
            None => (
                "SELECT id, tag, img_url, uploader, uploaderId, upload_time
                 FROM picar_images ORDER BY id",
                vec![],
            ),
        };

        let mut stmt = conn.prepare(sql).map_err(db_err)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                Ok(ImageRecord {
                    id: row.get(0)?,
                    tag: row.get(1)?,
                    img_url: row.get(2)?,
                    uploader: row.get(3)?,
                    uploader_id: row.get(4)?,
                    upload_time: parse_time(row.get::<_, String>(5)?),
                })
            })
            .map_err(db_err)?;

        let mut images = Vec::new();
        for image in rows {
            images.push(image.map_err(db_err)?);
        }
        Ok(images)
    }

    fn list_tags(&self) -> Result<Vec<TagRecord>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, tag FROM picar_tags ORDER BY id")
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TagRecord {
                    id: row.get(0)?,
                    tag: row.get(1)?,
                })
            })
            .map_err(db_err)?;

        let mut tags = Vec::new();
        for tag in rows {
            tags.push(tag.map_err(db_err)?);
        }
        Ok(tags)
    }

    fn tag_exists(&self, tag: &str) -> Result<bool, StorageError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM picar_tags WHERE tag = ?1", [tag], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count > 0)
    }

    fn add_tag(&self, tag: &str) -> Result<i64, StorageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("INSERT INTO picar_tags (tag) VALUES (?1)", [tag])
            .map_err(db_err)?;
        Ok(conn.last_insert_rowid())
    }
}

fn db_err(err: rusqlite::Error) -> StorageError {
    StorageError::Database(err.to_string())
}

/// Stored timestamps are RFC 3339; unparseable rows fall back to the epoch
fn parse_time(raw: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
