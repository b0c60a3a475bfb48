//! Page-number pagination (`?page=N&limit=M`).
//!
//! Responses carry absolute `next`/`previous` links that keep every other
//! query parameter of the original request intact.

/// Page size used when the client does not send `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 6;

/// Upper bound for client-requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            number: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.limit)
    }

    pub fn has_next(&self, total: i64) -> bool {
        self.number.saturating_mul(self.limit) < total
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Link to the following page, or `None` on the last page.
    pub fn next_link(
        &self,
        base_url: &str,
        path: &str,
        query: Option<&str>,
        total: i64,
    ) -> Option<String> {
        self.has_next(total)
            .then(|| page_link(base_url, path, query, self.number + 1))
    }

    /// Link to the preceding page, or `None` on the first page.
    pub fn previous_link(
        &self,
        base_url: &str,
        path: &str,
        query: Option<&str>,
    ) -> Option<String> {
        self.has_previous()
            .then(|| page_link(base_url, path, query, self.number - 1))
    }
}

/// Build `<base_url><path>?<query with page replaced>`. Page 1 drops the
/// `page` parameter entirely.
fn page_link(base_url: &str, path: &str, query: Option<&str>, page: i64) -> String {
    let mut params: Vec<String> = query
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("page"))
        .map(str::to_string)
        .collect();

    if page > 1 {
        params.push(format!("page={}", page));
    }

    let base = base_url.trim_end_matches('/');
    if params.is_empty() {
        format!("{}{}", base, path)
    } else {
        format!("{}{}?{}", base, path, params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Page::new(None, None);
        assert_eq!(page.number, 1);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let page = Page::new(Some(0), Some(1000));
        assert_eq!(page.number, 1);
        assert_eq!(page.limit, MAX_PAGE_SIZE);

        let page = Page::new(Some(-3), Some(0));
        assert_eq!(page.number, 1);
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Page::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_next_and_previous() {
        let page = Page::new(Some(2), Some(6));
        let base = "http://localhost:3000";
        assert_eq!(
            page.next_link(base, "/api/recipes/", Some("page=2&tags=lunch"), 13),
            Some("http://localhost:3000/api/recipes/?tags=lunch&page=3".to_string())
        );
        assert_eq!(
            page.previous_link(base, "/api/recipes/", Some("page=2&tags=lunch")),
            Some("http://localhost:3000/api/recipes/?tags=lunch".to_string())
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page = Page::new(Some(2), Some(6));
        assert_eq!(page.next_link("http://x", "/api/recipes/", None, 12), None);
        assert!(Page::new(None, None)
            .previous_link("http://x", "/api/recipes/", None)
            .is_none());
    }

    #[test]
    fn test_link_without_other_params() {
        let page = Page::new(None, None);
        assert_eq!(
            page.next_link("http://x/", "/api/users/", None, 7),
            Some("http://x/api/users/?page=2".to_string())
        );
    }
}
