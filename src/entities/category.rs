// 🏷️ Category Entity - Fixed set of expense categories
//
// The form only ever produces the seven known values. Blobs written by older
// builds (or edited by hand) may carry anything, so loading keeps unknown
// strings around as `Unrecognized` and renders them with a neutral colour.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display colour for categories outside the known set
pub const DEFAULT_COLOR: &str = "#8E9196";

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Food,
    Transport,
    Entertainment,
    Shopping,
    Utilities,
    Health,
    Other,

    /// Value read from storage that is not one of the known categories
    Unrecognized(String),
}

impl Category {
    /// All selectable categories, in display order
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Utilities,
        Category::Health,
        Category::Other,
    ];

    /// Stored (lowercase) value
    pub fn as_str(&self) -> &str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Utilities => "utilities",
            Category::Health => "health",
            Category::Other => "other",
            Category::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            Category::Food => "Food & Dining",
            Category::Transport => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Health => "Health & Medical",
            Category::Other => "Other",
            Category::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Chart colour as `#RRGGBB`
    pub fn color_hex(&self) -> &'static str {
        match self {
            Category::Food => "#6366F1",
            Category::Transport => "#06B6D4",
            Category::Entertainment => "#A855F7",
            Category::Shopping => "#F97316",
            Category::Utilities => "#14B8A6",
            Category::Health => "#22C55E",
            Category::Other => "#64748B",
            Category::Unrecognized(_) => DEFAULT_COLOR,
        }
    }

    /// Chart colour as an RGB triple
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.color_hex().trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).unwrap_or(0x80)
        };
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// Strict parse used by forms and the CLI: unknown values are rejected
    pub fn parse(input: &str) -> Option<Category> {
        let key = input.trim().to_lowercase();
        Category::ALL.iter().find(|c| c.as_str() == key).cloned()
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }

    /// Next selectable category (wraps around)
    pub fn next(&self) -> Category {
        let idx = self.position().map(|i| (i + 1) % Category::ALL.len()).unwrap_or(0);
        Category::ALL[idx].clone()
    }

    /// Previous selectable category (wraps around)
    pub fn previous(&self) -> Category {
        let len = Category::ALL.len();
        let idx = self.position().map(|i| (i + len - 1) % len).unwrap_or(len - 1);
        Category::ALL[idx].clone()
    }

    fn position(&self) -> Option<usize> {
        Category::ALL.iter().position(|c| c == self)
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::parse(&raw).unwrap_or(Category::Unrecognized(raw))
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!(Category::parse("food"), Some(Category::Food));
        assert_eq!(Category::parse("  Health "), Some(Category::Health));
        assert_eq!(Category::parse("groceries"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_unrecognized_round_trips_through_serde() {
        let category: Category = serde_json::from_str("\"crypto\"").unwrap();
        assert_eq!(category, Category::Unrecognized("crypto".to_string()));
        assert_eq!(category.color_hex(), DEFAULT_COLOR);
        assert_eq!(serde_json::to_string(&category).unwrap(), "\"crypto\"");

        let known: Category = serde_json::from_str("\"transport\"").unwrap();
        assert_eq!(known, Category::Transport);
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Category::Food.next(), Category::Transport);
        assert_eq!(Category::Other.next(), Category::Food);
        assert_eq!(Category::Food.previous(), Category::Other);
        assert_eq!(Category::Unrecognized("x".into()).next(), Category::Food);
    }

    #[test]
    fn test_rgb_decodes_hex() {
        assert_eq!(Category::Food.rgb(), (0x63, 0x66, 0xF1));
        assert_eq!(Category::Unrecognized("x".into()).rgb(), (0x8E, 0x91, 0x96));
    }
}
