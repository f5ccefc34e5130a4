//! The entity shown on a detail page.

use crate::slice::{Generation, Outcome};

/// The currently selected entity with its own fetch state.
///
/// Follows the same generation rule as [`Slice`](crate::Slice): only the
/// most recent [`begin`](Self::begin) is accepted back. A failed fetch keeps
/// the previously shown value.
#[derive(Debug, Clone)]
pub struct Selected<D> {
    value: Option<D>,
    is_loading: bool,
    last_error: Option<String>,
    generation: u64,
}

impl<D> Default for Selected<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Selected<D> {
    /// Nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: None,
            is_loading: false,
            last_error: None,
            generation: 0,
        }
    }

    /// The selected entity, if one has loaded.
    #[must_use]
    pub const fn value(&self) -> Option<&D> {
        self.value.as_ref()
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

    /// Starts a fetch, superseding any fetch still in flight.
    pub fn begin(&mut self) -> Generation {
        self.generation = self.generation.wrapping_add(1);
        self.is_loading = true;
        self.last_error = None;
        Generation(self.generation)
    }

    /// Shows `value` unless the fetch has been superseded.
    pub fn complete(&mut self, generation: Generation, value: D) -> Outcome {
        if self.is_stale(generation) {
            return Outcome::Stale;
        }
        self.value = Some(value);
        self.is_loading = false;
        Outcome::Applied
    }

    /// Records a failed fetch unless it has been superseded.
    pub fn fail(&mut self, generation: Generation, message: impl Into<String>) -> Outcome {
        if self.is_stale(generation) {
            return Outcome::Stale;
        }
        self.is_loading = false;
        self.last_error = Some(message.into());
        Outcome::Applied
    }

    /// Drops the selection. Fetches still in flight become stale.
    pub fn clear(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::new()
        };
    }

    fn is_stale(&self, generation: Generation) -> bool {
        if generation.0 == self.generation {
            return false;
        }
        tracing::debug!(
            slice = "selected",
            received = generation.0,
            current = self.generation,
            "discarding stale result"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_shows_value() {
        // Arrange
        let mut selected = Selected::new();
        let generation = selected.begin();
        assert!(selected.is_loading());

        // Act
        let outcome = selected.complete(generation, "The Matrix");

        // Assert
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(selected.value(), Some(&"The Matrix"));
        assert!(!selected.is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_value() {
        // Arrange
        let mut selected = Selected::new();
        let first = selected.begin();
        selected.complete(first, "The Matrix");

        // Act
        let second = selected.begin();
        selected.fail(second, "failed to load movie details");

        // Assert
        assert_eq!(selected.value(), Some(&"The Matrix"));
        assert_eq!(selected.last_error(), Some("failed to load movie details"));
        assert!(!selected.is_loading());
    }

    #[test]
    fn test_superseded_fetch_is_discarded() {
        // Arrange
        let mut selected = Selected::new();
        let old = selected.begin();
        let new = selected.begin();

        // Act
        selected.complete(new, "Inception");
        let outcome = selected.complete(old, "The Matrix");

        // Assert
        assert_eq!(outcome, Outcome::Stale);
        assert_eq!(selected.value(), Some(&"Inception"));
    }

    #[test]
    fn test_clear_makes_in_flight_fetch_stale() {
        // Arrange
        let mut selected: Selected<&str> = Selected::new();
        let generation = selected.begin();

        // Act
        selected.clear();
        let outcome = selected.fail(generation, "timeout");

        // Assert
        assert_eq!(outcome, Outcome::Stale);
        assert!(selected.value().is_none());
        assert!(selected.last_error().is_none());
        assert!(!selected.is_loading());
    }
}
