//! Page requests and pages of results.

use serde::Serialize;

use crate::error::DomainError;

/// Listings show this many posts per page.
pub const POSTS_PER_PAGE: u64 = 10;

/// A 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(number: u64, per_page: u64) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u64) -> Self {
        Self::new(1, per_page)
    }

    /// Parse the `?page=` query value. Missing means the first page;
    /// anything that is not a positive integer, or whose offset does not
    /// fit in a signed 64-bit SQL `OFFSET`, is a missing page.
    pub fn parse(raw: Option<&str>, per_page: u64) -> Result<Self, DomainError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::first(per_page)),
            Some(value) => match value.parse::<u64>() {
                Ok(number) if number >= 1 => {
                    let request = Self::new(number, per_page);
                    match request.checked_offset() {
                        Some(_) => Ok(request),
                        None => Err(DomainError::not_found("page", value)),
                    }
                }
                _ => Err(DomainError::not_found("page", value)),
            },
        }
    }

    fn checked_offset(&self) -> Option<u64> {
        (self.number - 1)
            .checked_mul(self.per_page)
            .filter(|offset| *offset <= i64::MAX as u64)
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> u64 {
        self.checked_offset().unwrap_or(u64::MAX)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            number: request.number,
            per_page: request.per_page,
            total_items,
        }
    }

    /// Page count; an empty listing still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Reject requests past the last page.
    pub fn ensure_exists(self) -> Result<Self, DomainError> {
        if self.number > self.num_pages() {
            Err(DomainError::not_found("page", self.number))
        } else {
            Ok(self)
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_numbers() {
        assert_eq!(PageRequest::parse(None, 10).unwrap().number, 1);
        assert_eq!(PageRequest::parse(Some(""), 10).unwrap().number, 1);
        assert_eq!(PageRequest::parse(Some("3"), 10).unwrap().offset(), 20);
        assert!(PageRequest::parse(Some("0"), 10).is_err());
        assert!(PageRequest::parse(Some("-1"), 10).is_err());
        assert!(PageRequest::parse(Some("last"), 10).is_err());
    }

    #[test]
    fn test_page_number_with_unrepresentable_offset_is_missing() {
        assert!(PageRequest::parse(Some("18446744073709551615"), 10).is_err());
        assert!(PageRequest::parse(Some("1000000000000000000"), 10).is_err());
        assert!(PageRequest::parse(Some("1000000000000000000"), 1).is_ok());
        assert_eq!(PageRequest::new(u64::MAX, 10).offset(), u64::MAX);
    }

    #[test]
    fn test_page_bounds() {
        let page: Page<u8> = Page::new(vec![], PageRequest::first(10), 0);
        assert_eq!(page.num_pages(), 1);
        assert!(!page.has_next());
        assert!(page.ensure_exists().is_ok());

        let page = Page::new(vec![1u8; 10], PageRequest::new(2, 10), 21);
        assert_eq!(page.num_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let page: Page<u8> = Page::new(vec![], PageRequest::new(4, 10), 21);
        assert!(page.ensure_exists().is_err());
    }
}
