pub mod errors;
pub mod gateway;
pub mod identity;
pub mod models;
pub mod signature;
pub mod storage;

pub use errors::{GatewayError, IdentityError, PaymentError, StoreError};
pub use gateway::{GatewayOrder, GatewayOrderRequest, OrderGateway};
pub use identity::{Identity, IdentityResolver};
pub use models::{FeeSchedule, PaymentCompletion, PaymentRecord, PaymentStatus};
pub use signature::{CallbackVerifier, sign_hmac_sha256_hex};
pub use storage::PaymentStore;
