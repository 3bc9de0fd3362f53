//! Application services built on the repository ports.

mod content_store;
mod pagination;
mod queries;
mod repositories;

pub use content_store::{ContentStore, SubmissionOutcome};
pub use pagination::{Paginated, resolve_page};
pub use queries::{BlogQueries, Listing, ListingPage, NavigationContext, PostDetail, QueryConfig};
pub use repositories::Repositories;
