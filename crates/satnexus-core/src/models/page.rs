use serde::Serialize;

use crate::error::{Result, SatnexusError};

/// One-based page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Both values must be positive
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        if page == 0 {
            return Err(SatnexusError::validation("Query parameter 'page' must be at least 1"));
        }
        if limit == 0 {
            return Err(SatnexusError::validation("Query parameter 'limit' must be at least 1"));
        }
        Ok(Self { page, limit })
    }

    /// Build from optional query values, falling back to defaults
    pub fn from_query(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Result<Self> {
        Self::new(page.unwrap_or(Self::DEFAULT_PAGE), limit.unwrap_or(default_limit))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records preceding this page
    pub fn skip(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: Self::DEFAULT_PAGE, limit: Self::DEFAULT_LIMIT }
    }
}

/// A page of results plus the total number of matching records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self { items, total, page: request.page, limit: request.limit }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1) as u64)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip() {
        assert_eq!(PageRequest::new(1, 10).unwrap().skip(), 0);
        assert_eq!(PageRequest::new(3, 25).unwrap().skip(), 50);
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
    }

    #[test]
    fn test_defaults_from_query() {
        let req = PageRequest::from_query(None, None, 10).unwrap();
        assert_eq!(req, PageRequest::default());

        let req = PageRequest::from_query(Some(2), None, 5).unwrap();
        assert_eq!(req.page(), 2);
        assert_eq!(req.limit(), 5);
    }

    #[test]
    fn test_total_pages() {
        let req = PageRequest::new(1, 10).unwrap();
        assert_eq!(Page::<u8>::new(vec![], 0, req).total_pages(), 0);
        assert_eq!(Page::<u8>::new(vec![], 10, req).total_pages(), 1);
        assert_eq!(Page::<u8>::new(vec![], 11, req).total_pages(), 2);
    }
}
