use serde::Serialize;

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn empty(per_page: u64) -> Self {
        Self {
            items: Vec::new(),
            number: 1,
            per_page,
            total: 0,
        }
    }

    /// Number of pages; an empty result still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        num_pages(self.total, self.per_page)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

fn num_pages(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Resolve a raw `page` query value against a result set of `total` items.
///
/// Missing or non-numeric values give the first page; numbers outside
/// `1..=num_pages` give the last page.
pub fn resolve_page(raw: Option<&str>, total: u64, per_page: u64) -> u64 {
    let last = num_pages(total, per_page);
    match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
        None => 1,
        Some(n) if n >= 1 && (n as u64) <= last => n as u64,
        Some(_) => last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_page_defaults_to_first() {
        assert_eq!(resolve_page(None, 50, 10), 1);
        assert_eq!(resolve_page(Some("abc"), 50, 10), 1);
        assert_eq!(resolve_page(Some(""), 50, 10), 1);
    }

    #[test]
    fn test_resolve_page_clamps_to_last() {
        assert_eq!(resolve_page(Some("3"), 50, 10), 3);
        assert_eq!(resolve_page(Some("9"), 50, 10), 5);
        assert_eq!(resolve_page(Some("0"), 50, 10), 5);
        assert_eq!(resolve_page(Some("-2"), 21, 10), 3);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let page: Paginated<u8> = Paginated::empty(10);
        assert_eq!(page.num_pages(), 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
        assert_eq!(resolve_page(Some("4"), 0, 10), 1);
    }

    #[test]
    fn test_navigation_flags() {
        let page = Paginated {
            items: vec![1, 2],
            number: 2,
            per_page: 2,
            total: 5,
        };
        assert_eq!(page.num_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.map(|n| n * 10).items, vec![10, 20]);
    }
}
