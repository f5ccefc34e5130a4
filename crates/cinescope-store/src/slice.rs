//! One paged result set and its fetch state.

use std::fmt;

use crate::store::SliceName;

/// Identifies one fetch against a slice.
///
/// Issued by [`Slice::begin`]; only the most recent one is accepted back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub(crate) u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a completed page is merged into the slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Discard existing items.
    Replace,
    /// "Load more": append after existing items, keeping received order.
    Append,
}

/// A page fetch, kept so a failed one can be retried as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Merge mode.
    pub mode: LoadMode,
}

impl PageRequest {
    /// Replace with `page`.
    #[must_use]
    pub const fn replace(page: u32) -> Self {
        Self {
            page,
            mode: LoadMode::Replace,
        }
    }

    /// Append `page`.
    #[must_use]
    pub const fn append(page: u32) -> Self {
        Self {
            page,
            mode: LoadMode::Append,
        }
    }
}

/// One fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageData<T> {
    /// Page number the upstream answered with.
    pub page: u32,
    /// Items in upstream order.
    pub items: Vec<T>,
    /// Total pages available.
    pub total_pages: u32,
    /// Total items available.
    pub total_results: u32,
}

/// Whether a completion was applied or discarded as superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The slice now reflects the result.
    Applied,
    /// A newer fetch had started; the result was dropped.
    Stale,
}

/// Items plus loading/error state for one named region of the view.
///
/// `is_loading` and `last_error` are never set at the same time: starting a
/// fetch clears the error, and a failure clears loading.
#[derive(Debug, Clone)]
pub struct Slice<T> {
    name: SliceName,
    items: Vec<T>,
    page: u32,
    total_pages: u32,
    total_results: u32,
    is_loading: bool,
    last_error: Option<String>,
    generation: u64,
    last_request: Option<PageRequest>,
}

impl<T> Slice<T> {
    /// Empty slice.
    #[must_use]
    pub const fn new(name: SliceName) -> Self {
        Self {
            name,
            items: Vec::new(),
            page: 0,
            total_pages: 0,
            total_results: 0,
            is_loading: false,
            last_error: None,
            generation: 0,
            last_request: None,
        }
    }

    /// Slice name.
    #[must_use]
    pub const fn name(&self) -> SliceName {
        self.name
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Last applied page (0 before any page was applied).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages reported by the last applied page.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Total results reported by the last applied page.
    #[must_use]
    pub const fn total_results(&self) -> u32 {
        self.total_results
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the last failed fetch, verbatim.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    /// Starts a fetch, superseding any fetch still in flight.
    pub fn begin(&mut self, request: PageRequest) -> Generation {
        self.generation = self.generation.wrapping_add(1);
        self.is_loading = true;
        self.last_error = None;
        self.last_request = Some(request);
        Generation(self.generation)
    }

    /// Applies a successful fetch unless it has been superseded.
    pub fn complete(&mut self, generation: Generation, data: PageData<T>) -> Outcome {
        if self.is_stale(generation) {
            return Outcome::Stale;
        }

        let mode = self.last_request.map_or(LoadMode::Replace, |r| r.mode);
        match mode {
            LoadMode::Replace => self.items = data.items,
            LoadMode::Append => self.items.extend(data.items),
        }
        self.page = data.page;
        self.total_pages = data.total_pages;
        self.total_results = data.total_results;
        self.is_loading = false;
        self.last_error = None;
        Outcome::Applied
    }

    /// Records a failed fetch unless it has been superseded.
    ///
    /// Items from earlier pages are kept.
    pub fn fail(&mut self, generation: Generation, message: impl Into<String>) -> Outcome {
        if self.is_stale(generation) {
            return Outcome::Stale;
        }

        self.is_loading = false;
        self.last_error = Some(message.into());
        Outcome::Applied
    }

    /// The request to repeat after a failure.
    #[must_use]
    pub fn retry_request(&self) -> Option<PageRequest> {
        self.last_error.as_ref().and(self.last_request)
    }

    /// "Load more" request for the following page, if there is one.
    #[must_use]
    pub fn next_page_request(&self) -> Option<PageRequest> {
        if self.is_loading || self.page == 0 || self.page >= self.total_pages {
            return None;
        }
        Some(PageRequest::append(self.page + 1))
    }

    /// Empties the slice. Fetches still in flight become stale.
    pub fn clear(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::new(self.name)
        };
    }

    fn is_stale(&self, generation: Generation) -> bool {
        if generation.0 == self.generation {
            return false;
        }
        tracing::debug!(
            slice = %self.name,
            received = generation.0,
            current = self.generation,
            "discarding stale result"
        );
        true
    }
}
