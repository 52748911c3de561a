/// A single piece of reply content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Image reference: a URL, a local path, or a data: URI carrying the payload
    Image(String),
}

/// One attributed part of a forwarded reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardNode {
    pub author_name: String,
    pub author_id: i64,
    pub segments: Vec<Segment>,
}

impl ForwardNode {
    pub fn new(author_name: impl Into<String>, author_id: i64) -> Self {
        Self {
            author_name: author_name.into(),
            author_id,
            segments: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into()));
        self
    }

    pub fn with_image(mut self, reference: impl Into<String>) -> Self {
        self.segments.push(Segment::Image(reference.into()));
        self
    }
}

/// What a command handler returns: a plain string or a forwarded multi-part message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Forward(Vec<ForwardNode>),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(s) => Some(s),
            Reply::Forward(_) => None,
        }
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

/// Inline image markup understood by the reply renderers
pub fn image_markup(reference: &str) -> String {
    format!("<img src=\"{}\"/>", reference)
}
