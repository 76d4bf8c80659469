pub mod auth;
pub mod logging;
pub mod response;

pub use auth::{auth_guard, AuthUser};
pub use logging::http_logging_middleware;
pub use response::{ApiResponse, ApiResult};
