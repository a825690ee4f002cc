//! Estimated-capacity text pagination for a page-by-page reader.
//!
//! [`pagination`] is the pure core; [`session`] keeps the state a reader view
//! needs around it (typography, viewport, current page).

pub mod bindings;
pub mod bookmark;
pub mod config;
pub mod pagination;
pub mod progress;
pub mod session;
pub mod text_utils;

pub use bookmark::PageBookmark;
pub use pagination::{LayoutMetrics, PageCapacity, PaginationConfig, paginate, paginate_with};
pub use progress::ReadingProgress;
pub use session::{ReaderSession, ReaderSnapshot, SessionCommand, SessionEvent};
