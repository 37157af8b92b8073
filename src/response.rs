//! Response bodies for the students resource.

use serde::Serialize;

#[derive(Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Serialize)]
pub struct Pagination {
    /// Rows in the whole table, not just this page.
    pub total: u64,
    pub limit: u32,
    pub page: u32,
}

#[derive(Serialize)]
pub struct Message {
    pub message: &'static str,
}

pub fn paginated<T: Serialize>(data: Vec<T>, total: u64, limit: u32, page: u32) -> Paginated<T> {
    Paginated {
        data,
        pagination: Pagination { total, limit, page },
    }
}

pub fn message(message: &'static str) -> Message {
    Message { message }
}
