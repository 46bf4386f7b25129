use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::PaymentError;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEX_LEN: usize = 64;

/// HMAC-SHA256 of `data` under `secret`, lowercase hex.
pub fn sign_hmac_sha256_hex(secret: &str, data: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// The message the gateway signs for a checkout callback.
pub fn callback_message(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

/// Checks checkout callback signatures against the gateway key secret.
#[derive(Clone)]
pub struct CallbackVerifier {
    secret: String,
}

impl CallbackVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        sign_hmac_sha256_hex(&self.secret, &callback_message(order_id, payment_id))
    }

    /// Accepts only the exact lowercase hex MAC the gateway sends. The
    /// bytes are compared in constant time once the form is canonical.
    pub fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        if !is_canonical_hex(signature) {
            return Err(PaymentError::SignatureMismatch);
        }
        let supplied = hex::decode(signature).map_err(|_| PaymentError::SignatureMismatch)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(callback_message(order_id, payment_id).as_bytes());
        mac.verify_slice(&supplied)
            .map_err(|_| PaymentError::SignatureMismatch)
    }
}

/// 64 lowercase hex digits, the only encoding `sign_hmac_sha256_hex` emits.
fn is_canonical_hex(signature: &str) -> bool {
    signature.len() == SIGNATURE_HEX_LEN
        && signature
            .bytes()
            .all(|byte| matches!(byte, b'0'..=b'9' | b'a'..=b'f'))
}

impl std::fmt::Debug for CallbackVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}
