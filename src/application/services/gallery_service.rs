//! Gallery service - the tag store commands

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rand::{Rng, RngCore};

use crate::application::errors::{CommandError, StorageError};
use crate::domain::entities::reply::image_markup;
use crate::domain::entities::{ForwardNode, Message, NewImage, Reply, User};
use crate::domain::traits::ImageStore;

/// Fixed page size for tag listings, 1-indexed pages
pub const PAGE_SIZE: usize = 10;

/// Missing-argument heuristic: absent, blank after trimming, or leading `<`
/// (unresolved placeholder syntax leaking through from the command parser)
pub fn missing_arg(arg: Option<&str>) -> bool {
    match arg {
        None => true,
        Some(raw) => {
            let raw = raw.trim();
            raw.is_empty() || raw.starts_with('<')
        }
    }
}

/// Tag store operations against the persistence seam
pub struct GalleryService {
    store: Arc<dyn ImageStore>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// One uniformly chosen stored image, unfiltered when no usable tag was given
    pub fn random_image(&self, tag: Option<&str>) -> Result<Reply, CommandError> {
        self.random_image_with(tag, &mut rand::rng())
    }

    /// Same as [`random_image`], with caller-supplied randomness
    pub fn random_image_with(&self, tag: Option<&str>, rng: &mut dyn RngCore) -> Result<Reply, CommandError> {
        let filter = if missing_arg(tag) { None } else { tag.map(str::trim) };
        let rows = self.store.images_by_tag(filter).map_err(store_err)?;

        if rows.is_empty() {
            return Ok(match filter {
                Some(tag) => Reply::text(format!("No images under tag '{}' yet.", tag)),
                None => Reply::text("No images stored yet."),
            });
        }

        let pick = &rows[rng.random_range(0..rows.len())];
        Ok(Reply::text(image_markup(&pick.img_url)))
    }

    /// Paginated tag listing as a forwarded multi-part message
    pub fn list_page(
        &self,
        tag: Option<&str>,
        page_arg: Option<&str>,
        requester: Option<&User>,
    ) -> Result<Reply, CommandError> {
        if missing_arg(tag) {
            return Ok(Reply::text("Usage: /pic.list <tag> [page]"));
        }
        let tag = tag.unwrap_or_default().trim();
        let page = page_arg
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(1);

        let rows = self.store.images_by_tag(Some(tag)).map_err(store_err)?;
        if rows.is_empty() {
            return Ok(Reply::text(format!("No images under tag '{}' yet.", tag)));
        }

        let total = rows.len();
        let total_pages = (total + PAGE_SIZE - 1) / PAGE_SIZE;
        if page == 0 || page > total_pages {
            return Ok(Reply::text(format!(
                "Page {} is out of range, valid pages are 1-{}.",
                page, total_pages
            )));
        }

        let author_name = requester
            .map(|u| u.display_name())
            .unwrap_or_else(|| "picar-bot".to_string());
        let author_id = requester.map(|u| u.numeric_id()).unwrap_or(0);

        let mut nodes: Vec<ForwardNode> = rows
            .iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(|row| ForwardNode::new(author_name.as_str(), author_id).with_image(row.img_url.as_str()))
            .collect();

        let mut trailer = format!("page {}/{}, {} total", page, total_pages, total);
        if page < total_pages {
            trailer.push_str(&format!("\nnext page: /pic.list {} {}", tag, page + 1));
        }
        nodes.push(ForwardNode::new(author_name.as_str(), author_id).with_text(trailer));

        Ok(Reply::Forward(nodes))
    }

    /// One bullet line per known tag, first-seen order, duplicates dropped
    pub fn list_tags(&self) -> Result<Reply, CommandError> {
        let rows = self.store.list_tags().map_err(store_err)?;
        if rows.is_empty() {
            return Ok(Reply::text("No images stored yet."));
        }

        let mut seen = HashSet::new();
        let lines: Vec<String> = rows
            .iter()
            .filter(|row| seen.insert(row.tag.as_str()))
            .map(|row| format!("- {}", row.tag))
            .collect();

        Ok(Reply::text(lines.join("\n")))
    }

    /// Store every image attached to the message or its quote under a tag
    pub fn add_images(&self, tag: Option<&str>, msg: &Message) -> Result<Reply, CommandError> {
        if missing_arg(tag) {
            return Ok(Reply::text(
                "Usage: /pic.add <tag> (attach the pictures, or quote a message containing them)",
            ));
        }
        let tag = tag.unwrap_or_default().trim();

        let attachments = msg.all_attachments();
        if attachments.is_empty() {
            return Ok(Reply::text(
                "No pictures found; attach them or quote a message containing them.",
            ));
        }

        if !self.store.tag_exists(tag).map_err(store_err)? {
            self.store.add_tag(tag).map_err(store_err)?;
            tracing::info!("Created tag '{}'", tag);
        }

        let uploader = msg
            .sender
            .as_ref()
            .map(|u| u.display_name())
            .unwrap_or_else(|| "unknown".to_string());
        let uploader_id = msg.sender.as_ref().map(|u| u.numeric_id()).unwrap_or(0);
        // One timestamp for the whole batch
        let upload_time = Utc::now();

        for attachment in &attachments {
            let image = NewImage::new(tag, attachment.url.as_str())
                .with_uploader(uploader.as_str(), uploader_id)
                .with_upload_time(upload_time);
            self.store.add_image(&image).map_err(store_err)?;
        }

        Ok(Reply::text(format!(
            "Added {} picture(s) under tag '{}'.",
            attachments.len(),
            tag
        )))
    }
}

fn store_err(err: StorageError) -> CommandError {
    CommandError::ExecutionFailed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Attachment, Segment};
    use crate::infrastructure::storage::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service_with_images(tags: &[&str]) -> GalleryService {
        let store = Arc::new(MemoryStore::new());
        for (i, tag) in tags.iter().enumerate() {
            store
                .add_image(&NewImage::new(*tag, format!("https://cdn.example/{}-{}.jpg", tag, i)))
                .unwrap();
        }
        GalleryService::new(store)
    }

    #[test]
    fn missing_arg_heuristic() {
        assert!(missing_arg(None));
        assert!(missing_arg(Some("")));
        assert!(missing_arg(Some("   ")));
        assert!(missing_arg(Some("<tag>")));
        assert!(!missing_arg(Some("cats")));
    }

    #[test]
    fn random_with_missing_arg_queries_unfiltered() {
        let service = service_with_images(&["cats", "dogs"]);
        let mut rng = StdRng::seed_from_u64(7);

        // An unresolved placeholder behaves like no argument at all
        let reply = service.random_image_with(Some("<tag>"), &mut rng).unwrap();
        let text = reply.as_text().unwrap().to_string();
        assert!(text.starts_with("<img src=\"https://cdn.example/"));
    }

    #[test]
    fn random_with_tag_restricts_to_that_tag() {
        let service = service_with_images(&["cats", "dogs", "dogs"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let reply = service.random_image_with(Some("cats"), &mut rng).unwrap();
            assert_eq!(
                reply.as_text(),
                Some("<img src=\"https://cdn.example/cats-0.jpg\"/>")
            );
        }
    }

    #[test]
    fn random_selection_covers_the_candidate_set() {
        let tags = ["n"; 5];
        let service = service_with_images(&tags);
        let mut rng = StdRng::seed_from_u64(42);

        let mut picked = HashSet::new();
        for _ in 0..60 {
            let reply = service.random_image_with(Some("n"), &mut rng).unwrap();
            picked.insert(reply.as_text().unwrap().to_string());
        }
        // Uniform over 5 candidates: 60 draws hit more than one of them
        assert!(picked.len() > 1);
        assert!(picked.len() <= 5);
    }

    #[test]
    fn random_with_no_rows_reports_no_images() {
        let service = GalleryService::new(Arc::new(MemoryStore::new()));
        let mut rng = StdRng::seed_from_u64(1);
        let reply = service.random_image_with(None, &mut rng).unwrap();
        assert_eq!(reply.as_text(), Some("No images stored yet."));
    }

    #[test]
    fn pagination_over_25_images() {
        let tags: Vec<&str> = std::iter::repeat("cats").take(25).collect();
        let service = service_with_images(&tags);
        let requester = User::new("9001").with_username("ada");

        for page in ["1", "2"] {
            let reply = service.list_page(Some("cats"), Some(page), Some(&requester)).unwrap();
            let Reply::Forward(nodes) = reply else { panic!("expected forward") };
            assert_eq!(nodes.len(), 11); // 10 images plus the trailer
        }

        let reply = service.list_page(Some("cats"), Some("3"), Some(&requester)).unwrap();
        let Reply::Forward(nodes) = reply else { panic!("expected forward") };
        assert_eq!(nodes.len(), 6);
        let Segment::Text(trailer) = &nodes.last().unwrap().segments[0] else {
            panic!("expected text trailer")
        };
        assert!(trailer.contains("page 3/3, 25 total"));
        assert!(!trailer.contains("next page"));

        let reply = service.list_page(Some("cats"), Some("4"), Some(&requester)).unwrap();
        assert_eq!(
            reply.as_text(),
            Some("Page 4 is out of range, valid pages are 1-3.")
        );
    }

    #[test]
    fn page_defaults_to_one_and_hints_the_next() {
        let tags: Vec<&str> = std::iter::repeat("cats").take(12).collect();
        let service = service_with_images(&tags);

        let reply = service.list_page(Some("cats"), None, None).unwrap();
        let Reply::Forward(nodes) = reply else { panic!("expected forward") };
        assert_eq!(nodes.len(), 11);
        let Segment::Text(trailer) = &nodes.last().unwrap().segments[0] else {
            panic!("expected text trailer")
        };
        assert!(trailer.contains("page 1/2, 12 total"));
        assert!(trailer.contains("next page: /pic.list cats 2"));
    }

    #[test]
    fn list_page_attributes_nodes_to_the_requester() {
        let service = service_with_images(&["cats"]);
        let requester = User::new("9001").with_username("ada");

        let reply = service.list_page(Some("cats"), None, Some(&requester)).unwrap();
        let Reply::Forward(nodes) = reply else { panic!("expected forward") };
        assert!(nodes.iter().all(|n| n.author_name == "ada" && n.author_id == 9001));
    }

    #[test]
    fn list_page_rejects_missing_tag() {
        let service = service_with_images(&["cats"]);
        for bad in [None, Some(""), Some("<tag>")] {
            let reply = service.list_page(bad, None, None).unwrap();
            assert_eq!(reply.as_text(), Some("Usage: /pic.list <tag> [page]"));
        }
    }

    #[test]
    fn list_tags_deduplicates_in_first_seen_order() {
        let store = Arc::new(MemoryStore::new());
        store.add_tag("cats").unwrap();
        store.add_tag("dogs").unwrap();
        store.add_tag("cats").unwrap();
        let service = GalleryService::new(store);

        let reply = service.list_tags().unwrap();
        assert_eq!(reply.as_text(), Some("- cats\n- dogs"));
    }

    #[test]
    fn list_tags_empty_reports_no_images() {
        let service = GalleryService::new(Arc::new(MemoryStore::new()));
        assert_eq!(service.list_tags().unwrap().as_text(), Some("No images stored yet."));
    }

    #[test]
    fn add_images_creates_the_tag_once_and_shares_one_timestamp() {
        let store = Arc::new(MemoryStore::new());
        let service = GalleryService::new(store.clone());

        let quoted = Message::from_text("c1", "these")
            .with_attachment(Attachment::new("https://cdn.example/a.jpg"))
            .with_attachment(Attachment::new("https://cdn.example/b.jpg"));
        let msg = Message::from_command("c1", "pic.add", vec!["cats".to_string()])
            .with_sender(User::new("9001").with_username("ada"))
            .with_attachment(Attachment::new("https://cdn.example/c.jpg"))
            .with_reply_to(quoted);

        let reply = service.add_images(Some("cats"), &msg).unwrap();
        assert_eq!(reply.as_text(), Some("Added 3 picture(s) under tag 'cats'."));

        let tags = store.list_tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag, "cats");

        let rows = store.images_by_tag(Some("cats")).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.upload_time == rows[0].upload_time));
        assert!(rows.iter().all(|r| r.uploader == "ada" && r.uploader_id == 9001));
        // Quoted attachments come first
        assert_eq!(rows[0].img_url, "https://cdn.example/a.jpg");
        assert_eq!(rows[2].img_url, "https://cdn.example/c.jpg");

        // Second batch under the same tag does not add another tag row
        let again = Message::from_command("c1", "pic.add", vec!["cats".to_string()])
            .with_attachment(Attachment::new("https://cdn.example/d.jpg"));
        service.add_images(Some("cats"), &again).unwrap();
        assert_eq!(store.list_tags().unwrap().len(), 1);
    }

    #[test]
    fn add_images_rejects_missing_tag_and_missing_pictures() {
        let service = GalleryService::new(Arc::new(MemoryStore::new()));

        let bare = Message::from_command("c1", "pic.add", vec![]);
        let reply = service.add_images(None, &bare).unwrap();
        assert!(reply.as_text().unwrap().starts_with("Usage:"));

        let reply = service.add_images(Some("<tag>"), &bare).unwrap();
        assert!(reply.as_text().unwrap().starts_with("Usage:"));

        let reply = service.add_images(Some("cats"), &bare).unwrap();
        assert!(reply.as_text().unwrap().starts_with("No pictures found"));
    }
}
