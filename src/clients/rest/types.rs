//! Payload types produced and consumed by the resource primitives.

use serde::{Deserialize, Serialize};

/// A downloaded file: the attachment filename and its raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileData {
    /// Filename from the `Content-Disposition` response header.
    pub filename: String,
    /// The response body, byte for byte.
    pub data: Vec<u8>,
}

/// Page position reported by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based number of this page.
    pub page_number: u64,
    /// Maximum number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_count: u64,
}

/// Navigation links of a page.
///
/// `next` is the only link the traversal follows; its absence ends it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    /// Link to the first page.
    pub first: String,
    /// Link to the last page.
    pub last: String,
    /// Link to the next page, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Link to the previous page, absent on the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// One page of a paginated listing.
///
/// # Example
///
/// ```rust
/// use resilient_rest::clients::rest::PaginatedData;
///
/// let page: PaginatedData<String> = serde_json::from_str(r#"{
///     "pagination": {"pageNumber": 1, "pageSize": 2, "totalCount": 3},
///     "links": {"first": "/items?page=1", "last": "/items?page=2", "next": "/items?page=2"},
///     "data": ["a", "b"]
/// }"#).unwrap();
///
/// assert_eq!(page.next_link(), Some("/items?page=2"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedData<T> {
    /// Position of this page.
    pub pagination: Pagination,
    /// Navigation links.
    pub links: PaginationLinks,
    /// Items on this page.
    pub data: Vec<T>,
}

impl<T> PaginatedData<T> {
    /// Returns the server-supplied link to the next page, if any.
    #[must_use]
    pub fn next_link(&self) -> Option<&str> {
        self.links.next.as_deref().filter(|link| !link.is_empty())
    }

    /// Returns `true` if this is the last page.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.next_link().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_without_next_link_is_last() {
        let page: PaginatedData<u32> = serde_json::from_value(json!({
            "pagination": {"pageNumber": 2, "pageSize": 2, "totalCount": 3},
            "links": {"first": "/runs?page=1", "last": "/runs?page=2", "prev": "/runs?page=1"},
            "data": [3]
        }))
        .unwrap();

        assert!(page.is_last_page());
        assert_eq!(page.links.prev.as_deref(), Some("/runs?page=1"));
        assert_eq!(page.pagination.total_count, 3);
    }

    #[test]
    fn test_empty_next_link_is_treated_as_absent() {
        let page: PaginatedData<u32> = serde_json::from_value(json!({
            "pagination": {"pageNumber": 1, "pageSize": 10, "totalCount": 0},
            "links": {"first": "", "last": "", "next": ""},
            "data": []
        }))
        .unwrap();

        assert!(page.is_last_page());
    }

    #[test]
    fn test_pagination_uses_camel_case_on_the_wire() {
        let value = serde_json::to_value(Pagination {
            page_number: 1,
            page_size: 25,
            total_count: 80,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"pageNumber": 1, "pageSize": 25, "totalCount": 80})
        );
    }
}
