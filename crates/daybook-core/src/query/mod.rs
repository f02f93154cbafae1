//! Listing query engine - filters, pagination and ordering.

mod filter;
mod ordering;
mod pagination;

pub use filter::{DateFilter, PostFilter, Scope};
pub use ordering::{SortOrder, StoreOrder, UnknownSortOrder, shuffle};
pub use pagination::{PAGE_SIZE, Page, PageRequest, paginate, total_pages};
