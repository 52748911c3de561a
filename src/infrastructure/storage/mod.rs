//! In-memory store - the injectable fake for the persistence seam

use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::entities::{ImageRecord, NewImage, TagRecord};
use crate::domain::traits::ImageStore;

/// In-memory image store; rows live in insertion order, ids count up from 1
#[derive(Default)]
pub struct MemoryStore {
    images: Mutex<Vec<ImageRecord>>,
    tags: Mutex<Vec<TagRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemoryStore {
    fn add_image(&self, image: &NewImage) -> Result<i64, StorageError> {
        let mut images = self.images.lock().unwrap();
        let id = images.len() as i64 + 1;
        images.push(ImageRecord {
            id,
            tag: image.tag.clone(),
            img_url: image.img_url.clone(),
            uploader: image.uploader.clone(),
            uploader_id: image.uploader_id,
            upload_time: image.upload_time,
        });
        Ok(id)
    }

    fn images_by_tag(&self, tag: Option<&str>) -> Result<Vec<ImageRecord>, StorageError> {
        let images = self.images.lock().unwrap();
        Ok(images
            .iter()
            .filter(|img| tag.map_or(true, |t| img.tag == t))
            .cloned()
            .collect())
    }

    fn list_tags(&self) -> Result<Vec<TagRecord>, StorageError> {
        Ok(self.tags.lock().unwrap().clone())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool, StorageError> {
        Ok(self.tags.lock().unwrap().iter().any(|t| t.tag == tag))
    }

    fn add_tag(&self, tag: &str) -> Result<i64, StorageError> {
        let mut tags = self.tags.lock().unwrap();
        let id = tags.len() as i64 + 1;
        tags.push(TagRecord { id, tag: tag.to_string() });
        Ok(id)
    }
}
