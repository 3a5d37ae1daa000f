/// Previous/next page controls over the server's page range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self { page, total_pages }
    }

    pub fn can_previous(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Target page for "previous", or `None` when the control is disabled
    pub fn previous_page(&self) -> Option<u32> {
        self.can_previous()
            .then(|| (self.page - 1).clamp(1, self.total_pages.max(1)))
    }

    /// Target page for "next", or `None` when the control is disabled
    pub fn next_page(&self) -> Option<u32> {
        self.can_next().then(|| (self.page + 1).clamp(1, self.total_pages))
    }

    pub fn label(&self) -> String {
        if self.total_pages == 0 {
            "Page - of -".to_string()
        } else {
            format!("Page {} of {}", self.page, self.total_pages)
        }
    }
}
