pub mod error;
pub mod routes;
pub mod service;

pub use error::ApiError;
pub use routes::{AppState, bearer_token, router};
pub use service::PaymentService;
