//! `ViewStore` - the named slices behind the catalog views.

use std::fmt;

use crate::slice::Slice;

/// Named regions of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceName {
    /// The category list being browsed.
    Browse,
    /// Search results.
    Search,
    /// Recommendations for the selected title.
    Recommendations,
}

impl fmt::Display for SliceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Browse => "browse",
            Self::Search => "search",
            Self::Recommendations => "recommendations",
        })
    }
}

/// All slices plus the current search query.
#[derive(Debug, Clone)]
pub struct ViewStore<T> {
    browse: Slice<T>,
    search: Slice<T>,
    recommendations: Slice<T>,
    search_query: String,
}

impl<T> Default for ViewStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewStore<T> {
    /// Empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            browse: Slice::new(SliceName::Browse),
            search: Slice::new(SliceName::Search),
            recommendations: Slice::new(SliceName::Recommendations),
            search_query: String::new(),
        }
    }

    /// Read access to one slice.
    #[must_use]
    pub const fn slice(&self, name: SliceName) -> &Slice<T> {
        match name {
            SliceName::Browse => &self.browse,
            SliceName::Search => &self.search,
            SliceName::Recommendations => &self.recommendations,
        }
    }

    /// Write access to one slice.
    pub const fn slice_mut(&mut self, name: SliceName) -> &mut Slice<T> {
        match name {
            SliceName::Browse => &mut self.browse,
            SliceName::Search => &mut self.search,
            SliceName::Recommendations => &mut self.recommendations,
        }
    }

    /// Current search query.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Sets the search query; results are left for the caller to refetch.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Clears the query and the search slice.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.search.clear();
    }

    /// Clears every slice and the query.
    pub fn reset(&mut self) {
        self.browse.clear();
        self.recommendations.clear();
        self.clear_search();
    }
}
