pub mod config;
pub mod contracts;
pub mod db;
pub mod identity;
pub mod razorpay;

pub use config::{JwtConfig, RazorpayConfig, ServiceConfig};
pub use contracts::{
    ErrorResponse, IssueOrderResponse, PaymentStatusResponse, VerifyPaymentRequest,
    VerifyPaymentResponse,
};
pub use db::connect_database;
pub use identity::{Claims, JwtIdentityResolver};
pub use razorpay::RazorpayClient;
