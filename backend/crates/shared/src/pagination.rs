//! Pagination contract
//!
//! Offset/limit parsing and the paginated response shape used by every
//! listing endpoint. Pages are 1-based; `perPage` is clamped to
//! `[1, MAX_PER_PAGE]`.

use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build from raw query values, applying defaults and clamping
    ///
    /// ```
    /// use kernel::pagination::PageRequest;
    ///
    /// let req = PageRequest::new(None, Some(500));
    /// assert_eq!(req.page(), 1);
    /// assert_eq!(req.per_page(), 100);
    /// ```
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page
            .map(|p| p.clamp(1, u32::MAX as i64) as u32)
            .unwrap_or(DEFAULT_PAGE);
        let per_page = per_page
            .map(|n| n.clamp(1, MAX_PER_PAGE as i64) as u32)
            .unwrap_or(DEFAULT_PER_PAGE);
        Self { page, per_page }
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// SQL OFFSET
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// SQL LIMIT
    #[inline]
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, total_items: u64, items: Vec<T>) -> Self {
        Self {
            current_page: request.page(),
            per_page: request.per_page(),
            total_items,
            total_pages: total_items.div_ceil(request.per_page() as u64),
            items,
        }
    }

    /// Transform the items while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            current_page: self.current_page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    /// Same paging metadata over replacement items
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            current_page: self.current_page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            items,
        }
    }
}

/// Slice an already ordered, already filtered collection
///
/// Used by the in-memory repositories so that they honour exactly the same
/// contract as the SQL `LIMIT/OFFSET` path.
pub fn paginate<T: Clone>(ordered: &[T], request: PageRequest) -> Page<T> {
    let start = (request.offset() as usize).min(ordered.len());
    let end = (start + request.per_page() as usize).min(ordered.len());
    Page::new(request, ordered.len() as u64, ordered[start..end].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.per_page(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(PageRequest::new(None, Some(0)).per_page(), 1);
        assert_eq!(PageRequest::new(None, Some(-5)).per_page(), 1);
        assert_eq!(PageRequest::new(None, Some(101)).per_page(), 100);
        assert_eq!(PageRequest::new(Some(0), None).page(), 1);
        assert_eq!(PageRequest::new(Some(-3), None).page(), 1);
    }

    #[test]
    fn test_offset() {
        let req = PageRequest::new(Some(3), Some(20));
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let req = PageRequest::new(Some(1), Some(10));
        assert_eq!(Page::<u8>::new(req, 0, vec![]).total_pages, 0);
        assert_eq!(Page::<u8>::new(req, 10, vec![]).total_pages, 1);
        assert_eq!(Page::<u8>::new(req, 11, vec![]).total_pages, 2);
    }

    #[test]
    fn test_paginate_slices() {
        let data: Vec<u32> = (0..25).collect();
        let page = paginate(&data, PageRequest::new(Some(3), Some(10)));
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3);

        let beyond = paginate(&data, PageRequest::new(Some(9), Some(10)));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.current_page, 9);
    }

    #[test]
    fn test_with_items_keeps_metadata() {
        let page = Page::new(PageRequest::new(Some(2), Some(3)), 7, vec![1u8, 2, 3]);
        let replaced = page.with_items(vec!["x"]);
        assert_eq!(replaced.current_page, 2);
        assert_eq!(replaced.per_page, 3);
        assert_eq!(replaced.total_items, 7);
        assert_eq!(replaced.total_pages, 3);
        assert_eq!(replaced.items, vec!["x"]);
    }

    #[test]
    fn test_serialized_shape() {
        let page = Page::new(PageRequest::default(), 1, vec!["a"]);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["perPage"], 10);
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["items"][0], "a");
    }
}
