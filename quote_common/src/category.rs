//! Category filter selected by the user.
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::quote::Quote;

/// Value persisted for the "show everything" filter.
pub const ALL_CATEGORIES: &str = "all";

/// Either every quote or the quotes of one category (compared case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Only quotes of the named category.
    Named(String),
}

impl CategoryFilter {
    /// Returns `true` if `quote` passes the filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => quote.in_category(name),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Named(trimmed.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}
