//! Request extractors whose rejections go through `AppError`.

mod body;
pub use body::{JsonBody, QueryParams};
