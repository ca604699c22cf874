//! Generic resource primitives.
//!
//! This module provides a higher-level client built on top of the
//! [`HttpClient`](crate::clients::HttpClient) call executor. Domain clients
//! (configs, runs, secrets, namespaces, ...) are thin wrappers around it.
//!
//! # Overview
//!
//! - [`RestClient`]: JSON CRUD, multipart upload, binary download and
//!   paginated listing
//! - [`FileData`]: a downloaded attachment
//! - [`PaginatedData`]: one page of a listing
//!
//! | Method | HTTP | Request body | Result |
//! |---|---|---|---|
//! | `get_resource` | GET | none | JSON `T` |
//! | `create_resource` | POST | JSON | JSON `T` |
//! | `update_resource` | PATCH | JSON | JSON `T` |
//! | `delete_resource` | DELETE | none | `()` |
//! | `upload_data` | POST / PATCH | multipart | `()` |
//! | `transform_data` | PATCH | JSON or multipart | [`FileData`] |
//! | `get_resource_binary_data` | GET | none | [`FileData`] |
//! | `call_via_post` | POST | none | `()` |
//! | `list_all_resources` | GET per page | none | `Vec<T>` |
//!
//! # Pagination
//!
//! `list_all_resources` follows the server-supplied `links.next` and nothing
//! else. Page numbers are never computed on the client, so the traversal
//! terminates and stays consistent when the server changes its paging state.

mod client;
mod types;

pub use client::RestClient;
pub use types::{FileData, PaginatedData, Pagination, PaginationLinks};
