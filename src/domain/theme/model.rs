//! Theme domain entity

use serde::{Deserialize, Serialize};

use crate::shared::errors::{DomainError, DomainResult};

/// Escape-room theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Unique theme ID
    pub id: i32,
    /// Theme name, unique across themes
    pub name: String,
    /// Free-form description (may be empty)
    pub description: String,
    /// Price in the smallest currency unit
    pub price: i32,
}

/// A theme that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTheme {
    pub name: String,
    pub description: String,
    pub price: i32,
}

impl NewTheme {
    pub fn new(
        name: impl AsRef<str>,
        description: impl Into<String>,
        price: i32,
    ) -> DomainResult<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Theme name must not be blank".into()));
        }
        if price < 0 {
            return Err(DomainError::Validation(format!(
                "Theme price must not be negative, got {}",
                price
            )));
        }
        Ok(Self {
            name: name.to_string(),
            description: description.into(),
            price,
        })
    }

    pub(crate) fn into_theme(self, id: i32) -> Theme {
        Theme {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_theme() {
        let t = NewTheme::new(" Haunted Manor ", "", 0).unwrap();
        assert_eq!(t.name, "Haunted Manor");
        assert_eq!(t.description, "");
        assert_eq!(t.into_theme(5).id, 5);
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(
            NewTheme::new("", "desc", 1000),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn negative_price_rejected() {
        assert!(matches!(
            NewTheme::new("name", "desc", -1),
            Err(DomainError::Validation(_))
        ));
    }
}
