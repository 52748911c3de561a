use std::fmt;

/// Represents a user in the system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            first_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name(mut self, first: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self
    }

    pub fn display_name(&self) -> String {
        if let Some(ref username) = self.username {
            username.clone()
        } else if let Some(ref first) = self.first_name {
            first.clone()
        } else {
            self.id.clone()
        }
    }

    /// Platform ids are strings; stored uploader ids are numeric
    pub fn numeric_id(&self) -> i64 {
        self.id.parse().unwrap_or(0)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_defaults_to_zero() {
        assert_eq!(User::new("12345").numeric_id(), 12345);
        assert_eq!(User::new("console").numeric_id(), 0);
    }

    #[test]
    fn display_name_prefers_username() {
        let user = User::new("42").with_username("ada").with_first_name("Ada");
        assert_eq!(user.display_name(), "ada");
        assert_eq!(User::new("42").with_first_name("Ada").display_name(), "Ada");
        assert_eq!(User::new("42").display_name(), "42");
    }
}
