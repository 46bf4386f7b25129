use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use feepay_core::PaymentError;
use feepay_platform::ErrorResponse;

/// Response wrapper for [`PaymentError`]. Internal detail of gateway and
/// store failures is logged where it happens and never returned to callers.
#[derive(Debug)]
pub struct ApiError(pub PaymentError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PaymentError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PaymentError::Conflict(_) => StatusCode::BAD_REQUEST,
            PaymentError::GatewayFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PaymentError::Validation(_) => StatusCode::BAD_REQUEST,
            PaymentError::SignatureMismatch => StatusCode::BAD_REQUEST,
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match &self.0 {
            PaymentError::Unauthenticated => "Unauthorized".to_string(),
            PaymentError::Conflict(message)
            | PaymentError::Validation(message)
            | PaymentError::NotFound(message) => message.clone(),
            PaymentError::GatewayFailure(_) => "Failed to create order".to_string(),
            PaymentError::SignatureMismatch => "Invalid signature".to_string(),
            PaymentError::PersistenceFailure(_) => "Failed to update payment".to_string(),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(value: PaymentError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_variant_to_documented_status() {
        let cases = [
            (PaymentError::Unauthenticated, StatusCode::UNAUTHORIZED, "Unauthorized"),
            (
                PaymentError::Conflict("Payment already completed".to_string()),
                StatusCode::BAD_REQUEST,
                "Payment already completed",
            ),
            (
                PaymentError::GatewayFailure("status=401".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create order",
            ),
            (
                PaymentError::Validation("Missing payment details".to_string()),
                StatusCode::BAD_REQUEST,
                "Missing payment details",
            ),
            (PaymentError::SignatureMismatch, StatusCode::BAD_REQUEST, "Invalid signature"),
            (
                PaymentError::NotFound("Payment record not found".to_string()),
                StatusCode::NOT_FOUND,
                "Payment record not found",
            ),
            (
                PaymentError::PersistenceFailure("connection reset".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update payment",
            ),
        ];

        for (error, status, message) in cases {
            let api = ApiError::from(error);
            assert_eq!(api.status(), status);
            assert_eq!(api.message(), message);
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let api = ApiError(PaymentError::PersistenceFailure("password=hunter2".to_string()));
        assert!(!api.message().contains("hunter2"));
    }
}
