//! View state: gallery or detail.
//!
//! A flat two-state machine. `navigate` overwrites both fields; there is no
//! history stack and no validation of the selected id. Resolution happens at
//! render time through [`ViewState::selected_record`], which yields `None` for
//! stale ids so the detail view can degrade to an empty state.
//!
//! State is held per [`Session`] rather than process-wide, so independent
//! sessions (and tests) never observe each other.

use crate::catalog::{Catalog, PlantRecord};
use crate::query::Query;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown view mode '{0}' (expected 'gallery' or 'detail')")]
pub struct ParseViewModeError(String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Gallery,
    Detail,
}

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gallery" | "home" => Ok(ViewMode::Gallery),
            "detail" => Ok(ViewMode::Detail),
            _ => Err(ParseViewModeError(s.to_string())),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Gallery => f.write_str("gallery"),
            ViewMode::Detail => f.write_str("detail"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    mode: ViewMode,
    selected_id: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Overwrite mode and selection in one step.
    pub fn navigate(&mut self, mode: ViewMode, id: Option<String>) {
        tracing::debug!(from = %self.mode, to = %mode, id = ?id, "navigate");
        self.mode = mode;
        self.selected_id = id;
    }

    pub fn open_detail(&mut self, id: impl Into<String>) {
        self.navigate(ViewMode::Detail, Some(id.into()));
    }

    /// Return to the initial gallery state.
    pub fn back(&mut self) {
        self.navigate(ViewMode::Gallery, None);
    }

    /// The selected record, if in detail mode and the id still exists.
    pub fn selected_record(&self, catalog: &Catalog) -> Option<&'static PlantRecord> {
        match self.mode {
            ViewMode::Detail => self.selected_id.as_deref().and_then(|id| catalog.find(id)),
            ViewMode::Gallery => None,
        }
    }
}

/// Everything one client needs for a render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub view: ViewState,
    pub query: Query,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: Query) -> Self {
        Self {
            view: ViewState::default(),
            query,
        }
    }
}
