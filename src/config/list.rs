//! Named defaults for list queries. Resolved once per request into a `ListSpec`.

use crate::query::SortOrder;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_PAGE: u32 = 1;
pub const MAX_LIMIT: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListDefaults {
    pub limit: u32,
    pub page: u32,
    pub sort: SortOrder,
    /// Requested limits above this are clamped.
    pub max_limit: u32,
}

impl Default for ListDefaults {
    fn default() -> Self {
        ListDefaults {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
            sort: SortOrder::Desc,
            max_limit: MAX_LIMIT,
        }
    }
}
