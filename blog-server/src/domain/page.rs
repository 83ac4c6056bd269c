use serde::Serialize;

pub const PAGE_SIZE: u32 = 10;

/// Splits `total` items into fixed-size pages and clamps requested
/// page numbers into range.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u32,
    total: u64,
}

impl Paginator {
    pub fn new(total: u64) -> Self {
        Self::with_page_size(PAGE_SIZE, total)
    }

    pub fn with_page_size(per_page: u32, total: u64) -> Self {
        Self {
            per_page: per_page.max(1),
            total,
        }
    }

    /// Never zero: an empty listing still has one (empty) page.
    pub fn num_pages(&self) -> u32 {
        if self.total == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Turns a raw `?page=` value into a valid page number.
    ///
    /// Missing or garbage input gives the first page, anything below 1
    /// the first page, anything past the end (or `last`) the last.
    pub fn clamp(&self, requested: Option<&str>) -> u32 {
        let last = self.num_pages();
        let Some(raw) = requested.map(str::trim) else {
            return 1;
        };
        if raw == "last" {
            return last;
        }
        match raw.parse::<i64>() {
            Ok(n) if n < 1 => 1,
            Ok(n) => u32::try_from(n).map_or(last, |n| n.min(last)),
            // digit strings too long for i64 are still "past the end"
            Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => last,
            Err(_) => 1,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self, number: u32) -> i64 {
        i64::from(number.saturating_sub(1)) * i64::from(self.per_page)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub num_pages: u32,
    pub total: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u32, paginator: &Paginator) -> Self {
        let num_pages = paginator.num_pages();
        Self {
            items,
            number,
            num_pages,
            total: paginator.total,
            has_previous: number > 1,
            has_next: number < num_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(25, 3)]
    fn counts_pages(#[case] total: u64, #[case] pages: u32) {
        assert_eq!(Paginator::new(total).num_pages(), pages);
    }

    #[rstest]
    #[case::missing(None, 1)]
    #[case::first(Some("1"), 1)]
    #[case::middle(Some("2"), 2)]
    #[case::zero(Some("0"), 1)]
    #[case::negative(Some("-4"), 1)]
    #[case::past_end(Some("99"), 3)]
    #[case::huge(Some("123456789012345678901234567890"), 3)]
    #[case::garbage(Some("abc"), 1)]
    #[case::empty(Some(""), 1)]
    #[case::padded(Some(" 3 "), 3)]
    #[case::last_keyword(Some("last"), 3)]
    fn clamps_requested_page(#[case] requested: Option<&str>, #[case] expected: u32) {
        let paginator = Paginator::new(25);
        assert_eq!(paginator.clamp(requested), expected);
    }

    #[test]
    fn empty_listing_clamps_to_first_page() {
        let paginator = Paginator::new(0);
        assert_eq!(paginator.clamp(Some("7")), 1);
        assert_eq!(paginator.offset(1), 0);
    }

    #[test]
    fn page_flags() {
        let paginator = Paginator::new(25);
        assert_eq!(paginator.offset(3), 20);

        let page = Page::new(vec![1, 2, 3, 4, 5], 3, &paginator);
        assert!(page.has_previous);
        assert!(!page.has_next);
        assert_eq!(page.num_pages, 3);
        assert_eq!(page.total, 25);

        let first: Page<u8> = Page::new(Vec::new(), 1, &paginator);
        assert!(!first.has_previous);
        assert!(first.has_next);
    }
}
