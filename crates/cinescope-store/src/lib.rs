//! View state for catalog listings.
//!
//! Each named slice holds one paged result set with its own loading and
//! error flags. Every fetch is tagged with the slice's generation at the time
//! it started; results from superseded fetches are discarded, so the most
//! recent request wins regardless of completion order.

mod selected;
mod slice;
mod store;

pub use selected::Selected;
pub use slice::{Generation, LoadMode, Outcome, PageData, PageRequest, Slice};
#[allow(clippy::module_name_repetitions)]
pub use store::{SliceName, ViewStore};
