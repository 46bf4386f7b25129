use thiserror::Error;

/// Failures surfaced by the order issuer and the payment verifier.
///
/// Each variant maps to exactly one HTTP status at the API boundary.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("{0}")]
    Conflict(String),
    #[error("gateway order creation failed: {0}")]
    GatewayFailure(String),
    #[error("{0}")]
    Validation(String),
    #[error("invalid signature")]
    SignatureMismatch,
    #[error("{0}")]
    NotFound(String),
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("payment store backend error: {0}")]
    Backend(String),
    #[error("payment store returned invalid data: {0}")]
    InvalidData(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http error: {0}")]
    Http(String),
    #[error("gateway api error status={status} body={body}")]
    Api { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

impl From<StoreError> for PaymentError {
    fn from(value: StoreError) -> Self {
        PaymentError::PersistenceFailure(value.to_string())
    }
}

impl From<GatewayError> for PaymentError {
    fn from(value: GatewayError) -> Self {
        PaymentError::GatewayFailure(value.to_string())
    }
}

impl From<IdentityError> for PaymentError {
    fn from(_: IdentityError) -> Self {
        PaymentError::Unauthenticated
    }
}
