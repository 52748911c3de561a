use crate::application::errors::StorageError;
use crate::domain::entities::{ImageRecord, NewImage, TagRecord};

/// ImageStore trait - narrow persistence capability for the picture gallery
///
/// The image table and the tag table are decoupled: image rows carry a plain
/// tag string, the tag table is the authoritative set of known tag names.
pub trait ImageStore: Send + Sync {
    /// Append one image row, returning its assigned id
    fn add_image(&self, image: &NewImage) -> Result<i64, StorageError>;

    /// Images in insertion order, filtered by tag when one is given
    fn images_by_tag(&self, tag: Option<&str>) -> Result<Vec<ImageRecord>, StorageError>;

    /// All known tag rows
    fn list_tags(&self) -> Result<Vec<TagRecord>, StorageError>;

    /// Whether a tag name already has a row
    fn tag_exists(&self, tag: &str) -> Result<bool, StorageError>;

    /// Insert a tag row for a previously-unseen tag name
    fn add_tag(&self, tag: &str) -> Result<i64, StorageError>;
}
