pub mod api;
pub mod storage;

pub use api::{ApiError, ApiService};
