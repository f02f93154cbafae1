//! Page-number pagination over a filtered post store.

use serde::Serialize;

use super::filter::PostFilter;
use super::ordering::SortOrder;
use crate::domain::Post;
use crate::error::RepoError;
use crate::ports::PostRepository;

/// Fixed page size of every listing.
pub const PAGE_SIZE: u64 = 3;

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    /// Request `page` with the default page size. Zero falls back to page 1.
    pub fn new(page: u64) -> Self {
        Self::with_size(page, PAGE_SIZE)
    }

    pub fn with_size(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Parse a raw `page` query parameter.
    ///
    /// Absent, non-numeric, zero and negative values all mean page 1.
    pub fn parse(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p > 0)
            .map_or(1, |p| p as u64);
        Self::new(page)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of matching records skipped before this window.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// `ceil(total_items / per_page)`, zero for an empty result.
pub fn total_pages(total_items: u64, per_page: u64) -> u64 {
    total_items.div_ceil(per_page.max(1))
}

/// Page descriptor: one window of items plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub items_per_page: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            current_page: request.page(),
            total_pages: total_pages(total_items, request.per_page()),
            items_per_page: request.per_page(),
            total_items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            items_per_page: self.items_per_page,
            total_items: self.total_items,
        }
    }
}

/// Count every match, then fetch the requested window in `order`.
///
/// Pages past the end come back empty; that is not an error here.
pub async fn paginate(
    repo: &dyn PostRepository,
    filter: &PostFilter,
    order: SortOrder,
    request: PageRequest,
) -> Result<Page<Post>, RepoError> {
    let total_items = repo.count(filter).await?;
    let mut items = if request.offset() >= total_items {
        Vec::new()
    } else {
        repo.find_page(
            filter,
            order.store_order(),
            request.offset(),
            request.per_page(),
        )
        .await?
    };
    order.arrange(&mut items, &mut rand::thread_rng());

    Ok(Page::new(items, request, total_items))
}
