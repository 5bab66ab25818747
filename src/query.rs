//! Catalog filtering.
//!
//! Two independent constraints, applied in sequence:
//!
//! 1. **Category**: substring containment against the record's `category`
//!    (case-sensitive). Filtering by `"Hormonal"` also keeps `"Hormonal (Exp)"`.
//! 2. **Search**: case-insensitive substring match against `common_name` or
//!    `description`.
//!
//! Both are plain predicates, so the result is the intersection of the two
//! and does not depend on the order they are applied in. Output preserves
//! catalog order.

use crate::catalog::PlantRecord;
use std::fmt;

/// Labels that select every category.
const ALL_SENTINELS: &[&str] = &["todas", "all"];

/// Category constraint for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Keep records whose category contains this text.
    Contains(String),
}

impl CategoryFilter {
    /// Parse a user-facing option. `"Todas"`, `"all"` (any case) and the
    /// empty string mean no constraint.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || ALL_SENTINELS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(trimmed))
        {
            CategoryFilter::All
        } else {
            CategoryFilter::Contains(trimmed.to_string())
        }
    }

    pub fn matches(&self, record: &PlantRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Contains(needle) => record.category.contains(needle.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("Todas"),
            CategoryFilter::Contains(needle) => f.write_str(needle),
        }
    }
}

/// Search + category state for one gallery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub category: CategoryFilter,
    pub search: String,
}

impl Query {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    pub fn apply<'a>(&self, records: &'a [PlantRecord]) -> Vec<&'a PlantRecord> {
        filter(records, &self.category, &self.search)
    }
}

/// Case-insensitive search predicate. Empty text matches everything.
pub fn matches_search(record: &PlantRecord, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }
    let needle = search_text.to_lowercase();
    record.common_name.to_lowercase().contains(&needle)
        || record.description.to_lowercase().contains(&needle)
}

/// Stable filter: category first, then search.
pub fn filter<'a>(
    records: &'a [PlantRecord],
    category: &CategoryFilter,
    search_text: &str,
) -> Vec<&'a PlantRecord> {
    let _span = tracing::debug_span!(
        "filter",
        total = records.len(),
        category = %category,
        search_len = search_text.len()
    )
    .entered();

    let filtered: Vec<&PlantRecord> = records
        .iter()
        .filter(|r| category.matches(r))
        .filter(|r| matches_search(r, search_text))
        .collect();

    tracing::debug!(matched = filtered.len(), "catalog filtered");
    filtered
}
