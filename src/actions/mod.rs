//! Actions performed on confirmed duplicate groups.

pub mod delete;

pub use delete::{delete_duplicates, BatchDeleteResult, DeleteError};
