use serde::Serialize;

/// Upper bound on page size for list endpoints.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination query parameters (already clamped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u64,
    pub limit: u64,
}

impl PaginationParams {
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Saturates at `i64::MAX`, the largest offset SQLite accepts.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

/// Page metadata returned next to list data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PageInfo {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let limit = limit.max(1);
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit).max(1),
        }
    }
}

/// Paginated result wrapper
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, params: PaginationParams) -> Self {
        Self {
            items,
            pagination: PageInfo::new(params.page, params.limit, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let info = PageInfo::new(2, 10, 25);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.page, 2);
        assert_eq!(info.total, 25);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        assert_eq!(PageInfo::new(1, 10, 0).total_pages, 1);
    }

    #[test]
    fn params_are_clamped() {
        let p = PaginationParams::new(Some(0), Some(1000), 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, MAX_PAGE_SIZE);
        assert_eq!(PaginationParams::new(None, None, 10).limit, 10);
        assert_eq!(PaginationParams::new(Some(3), Some(10), 10).offset(), 20);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let p = PaginationParams::new(Some(u64::MAX), Some(100), 10);
        assert_eq!(p.offset(), i64::MAX as u64);
    }
}
