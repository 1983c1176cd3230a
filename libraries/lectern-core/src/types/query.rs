/// Library view selection: section, search term and sort key
use serde::{Deserialize, Serialize};

/// Which slice of the library is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    All,
    /// Most recently played first
    Recent,
    Favorites,
    /// Started but not finished
    Continue,
}

impl Section {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Recent => "recent",
            Self::Favorites => "favorites",
            Self::Continue => "continue",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "recent" => Some(Self::Recent),
            "favorites" => Some(Self::Favorites),
            "continue" => Some(Self::Continue),
            _ => None,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first
    #[default]
    Date,
    Title,
    Instructor,
    /// Longest first
    Duration,
}

impl SortKey {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Instructor => "instructor",
            Self::Duration => "duration",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "date" => Some(Self::Date),
            "title" => Some(Self::Title),
            "instructor" => Some(Self::Instructor),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current filter, search and sort selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryState {
    pub search: String,
    pub sort: SortKey,
    pub section: Section,
}

impl QueryState {
    pub fn new(section: Section, search: impl Into<String>, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            sort,
            section,
        }
    }

    /// Lowercased, trimmed search term
    pub fn needle(&self) -> String {
        self.search.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_round_trips_through_str() {
        for section in [
            Section::All,
            Section::Recent,
            Section::Favorites,
            Section::Continue,
        ] {
            assert_eq!(Section::from_str(section.as_str()), Some(section));
        }
        assert_eq!(Section::from_str("bogus"), None);
    }

    #[test]
    fn sort_key_defaults_to_date() {
        assert_eq!(SortKey::default(), SortKey::Date);
        assert_eq!(SortKey::from_str("duration"), Some(SortKey::Duration));
    }

    #[test]
    fn needle_is_lowercase_and_trimmed() {
        let query = QueryState::new(Section::All, "  Recursion ", SortKey::Title);
        assert_eq!(query.needle(), "recursion");
    }
}
