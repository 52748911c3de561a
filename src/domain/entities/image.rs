use chrono::{DateTime, Utc};

/// One stored image row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: i64,
    pub tag: String,
    pub img_url: String,
    pub uploader: String,
    pub uploader_id: i64,
    pub upload_time: DateTime<Utc>,
}

/// Insert payload for an image row; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub tag: String,
    pub img_url: String,
    pub uploader: String,
    pub uploader_id: i64,
    pub upload_time: DateTime<Utc>,
}

impl NewImage {
    pub fn new(tag: impl Into<String>, img_url: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            img_url: img_url.into(),
            uploader: String::new(),
            uploader_id: 0,
            upload_time: Utc::now(),
        }
    }

    pub fn with_uploader(mut self, name: impl Into<String>, id: i64) -> Self {
        self.uploader = name.into();
        self.uploader_id = id;
        self
    }

    pub fn with_upload_time(mut self, time: DateTime<Utc>) -> Self {
        self.upload_time = time;
        self
    }
}

/// One known tag name; the tag table is the authoritative set of tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub id: i64,
    pub tag: String,
}
