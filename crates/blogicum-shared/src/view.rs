//! Template context types.

use serde::Serialize;

/// Pagination block rendered under every listing.
#[derive(Debug, Clone, Serialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total_items: u64,
    pub has_previous: bool,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
}

impl<T> PageView<T> {
    pub fn new(items: Vec<T>, number: u64, num_pages: u64, total_items: u64) -> Self {
        let has_previous = number > 1;
        let has_next = number < num_pages;
        Self {
            items,
            number,
            num_pages,
            total_items,
            has_previous,
            has_next,
            previous_page: has_previous.then(|| number - 1),
            next_page: has_next.then(|| number + 1),
        }
    }
}

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_links() {
        let first = PageView::new(vec![1, 2], 1, 3, 25);
        assert!(!first.has_previous);
        assert_eq!(first.next_page, Some(2));

        let last = PageView::new(vec![5], 3, 3, 25);
        assert_eq!(last.previous_page, Some(2));
        assert_eq!(last.next_page, None);

        let json = serde_json::to_value(&last).unwrap();
        assert!(json.get("next_page").is_none());
        assert_eq!(json["num_pages"], 3);
    }
}
