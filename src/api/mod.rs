mod client;
mod error;
mod types;

pub use client::PlannerClient;
pub use error::{ApiError, ApiResult};
pub use types::*;
