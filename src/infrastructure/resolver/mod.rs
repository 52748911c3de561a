//! Template resolution - replaces placeholder tokens with inline image payloads

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::{Rng, RngCore};

use crate::domain::entities::reply::image_markup;
use crate::infrastructure::sources::{fetch_image, SourceLister};

/// The literal placeholder token replaced at resolution time
pub const PLACEHOLDER: &str = "{pict}";

/// Resolves command templates against a picture source
pub struct TemplateResolver {
    lister: SourceLister,
}

impl TemplateResolver {
    pub fn new(lister: SourceLister) -> Self {
        Self { lister }
    }

    /// Resolve with the thread rng
    pub fn resolve(&self, template: &str, source: &str) -> String {
        self.resolve_with(template, source, &mut rand::rng())
    }

    /// Resolve with caller-supplied randomness
    ///
    /// Each placeholder occurrence makes its own uniform draw over the
    /// candidate set and its own fetch; a template without placeholders is
    /// returned unchanged without touching the source at all.
    pub fn resolve_with(&self, template: &str, source: &str, rng: &mut dyn RngCore) -> String {
        let spans: Vec<usize> = template.match_indices(PLACEHOLDER).map(|(i, _)| i).collect();
        if spans.is_empty() {
            return template.to_string();
        }

        let candidates = self.lister.list_candidates(source);

        // Splice by position so payload bytes are never re-scanned for the token
        let mut resolved = String::with_capacity(template.len());
        let mut cursor = 0;
        for start in spans {
            resolved.push_str(&template[cursor..start]);
            resolved.push_str(&substitution(&candidates, rng));
            cursor = start + PLACEHOLDER.len();
        }
        resolved.push_str(&template[cursor..]);
        resolved
    }
}

/// One substitution: empty when there is nothing to draw from or the fetch fails
fn substitution(candidates: &[String], rng: &mut dyn RngCore) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let pick = &candidates[rng.random_range(0..candidates.len())];
    match fetch_image(pick) {
        Ok(image) => image_markup(&format!("data:{};base64,{}", image.mime, BASE64.encode(&image.bytes))),
        Err(e) => {
            tracing::error!("Failed to fetch picture {}: {}", pick, e);
            String::new()
        }
    }
}
