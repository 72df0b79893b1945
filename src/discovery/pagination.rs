/// Page size used when nothing else is configured
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }
}

/// Where the next "load more" continues from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub next_page: u32,
    pub more_available: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            next_page: 1,
            more_available: false,
        }
    }
}

impl PageCursor {
    /// Cursor after `request` returned `returned` items.
    ///
    /// The API sends no total, so only a completely full page implies more.
    pub fn after(request: PageRequest, returned: usize) -> Self {
        Self {
            next_page: request.page + 1,
            more_available: returned == request.limit as usize,
        }
    }

    pub fn next_request(&self, limit: u32) -> PageRequest {
        PageRequest {
            page: self.next_page,
            limit,
        }
    }
}
