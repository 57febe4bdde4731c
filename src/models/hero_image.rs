//! A slide of the website's hero-image carousel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct HeroImage {
    pub id: Uuid,

    /// Generated storage key: `{unix_millis}-{suffix}.{ext}`.
    pub file_name: String,

    /// Public URL of the stored object.
    pub file_url: String,

    pub title: String,
    pub subtitle: String,
    pub description: String,

    /// Position in the carousel, ascending.
    pub display_order: i64,

    /// Whether the title/subtitle/description overlay is rendered.
    pub show_content: bool,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

/// Caption fields accepted alongside an uploaded hero image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeroImageFields {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub display_order: i64,
    pub show_content: bool,
}

impl HeroImageFields {
    /// Lenient parse of the `display_order` form value; anything unparsable is 0.
    pub fn parse_display_order(raw: &str) -> i64 {
        raw.trim().parse::<i64>().unwrap_or(0)
    }

    /// Only the literal `"true"` enables the overlay.
    pub fn parse_show_content(raw: &str) -> bool {
        raw == "true"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_order_falls_back_to_zero() {
        assert_eq!(HeroImageFields::parse_display_order("3"), 3);
        assert_eq!(HeroImageFields::parse_display_order(" -2 "), -2);
        assert_eq!(HeroImageFields::parse_display_order("first"), 0);
        assert_eq!(HeroImageFields::parse_display_order(""), 0);
    }

    #[test]
    fn show_content_requires_literal_true() {
        assert!(HeroImageFields::parse_show_content("true"));
        assert!(!HeroImageFields::parse_show_content("TRUE"));
        assert!(!HeroImageFields::parse_show_content("1"));
        assert!(!HeroImageFields::parse_show_content(""));
    }
}
