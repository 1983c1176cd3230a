//! Lectern Library
//!
//! The lecture collection and everything derived from it:
//!
//! - **Catalog**: loading the catalog document (bundled, file or URL) and the
//!   add/import/export edit workflow
//! - **Store**: `Library`, the catalog merged with persisted user state,
//!   with the favorites set and recent history
//! - **Query**: `view`, the filtered and sorted list shown to the user
//! - **Locator**: mapping a lecture to an audio location
//!
//! # Example
//!
//! ```rust,no_run
//! use lectern_core::{QueryState, Section, SortKey, StateStore};
//! use lectern_library::{query, CatalogSource, Library};
//!
//! # async fn example(store: &dyn StateStore) -> Result<(), Box<dyn std::error::Error>> {
//! let library = Library::load(&CatalogSource::Bundled, store).await?;
//! let query = QueryState::new(Section::Continue, "", SortKey::Date);
//! for lecture in query::view(&library, &query) {
//!     println!("{} ({})", lecture.title, lecture.instructor);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
mod error;
pub mod history;
pub mod locator;
pub mod query;
mod store;

pub use catalog::{
    Catalog, CatalogDocument, CatalogSource, ExportDocument, ImportSummary, NewLecture,
};
pub use error::{CatalogError, Result};
pub use history::RecentHistory;
pub use locator::{audio_locator, DEFAULT_AUDIO_BASE};
pub use query::view;
pub use store::Library;
