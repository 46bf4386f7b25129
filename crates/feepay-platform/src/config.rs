use anyhow::{Context, Result};

pub const DEFAULT_RAZORPAY_API_BASE: &str = "https://api.razorpay.com";
pub const DEFAULT_RAZORPAY_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database_url: String,
    pub http_addr: String,
    pub razorpay: RazorpayConfig,
    pub jwt: JwtConfig,
}

#[derive(Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub audience: Option<String>,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_lookup(default_http_addr, |key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(default_http_addr: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{key} is required"))
        };

        let database_url = required("DATABASE_URL")?;
        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string());

        let timeout_secs = match lookup("RAZORPAY_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("RAZORPAY_TIMEOUT_SECS must be a whole number, got '{raw}'"))?,
            None => DEFAULT_RAZORPAY_TIMEOUT_SECS,
        };

        let razorpay = RazorpayConfig {
            key_id: required("RAZORPAY_KEY_ID")?,
            key_secret: required("RAZORPAY_KEY_SECRET")?,
            api_base: lookup("RAZORPAY_API_BASE")
                .unwrap_or_else(|| DEFAULT_RAZORPAY_API_BASE.to_string()),
            timeout_secs,
        };

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            audience: lookup("JWT_AUDIENCE").filter(|value| !value.trim().is_empty()),
        };

        Ok(Self {
            database_url,
            http_addr,
            razorpay,
            jwt,
        })
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("audience", &self.audience)
            .finish()
    }
}
