//! Payload checks run by handlers before the store is called.

mod validation;
pub use validation::RequestValidator;
