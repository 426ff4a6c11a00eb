use std::env;

/// Merchant defaults picked up from the environment, so the CLI can be
/// used without repeating key, name and city on every invocation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub key: Option<String>,
    pub merchant_name: Option<String>,
    pub merchant_city: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            key: env::var("PIX_KEY").ok(),
            merchant_name: env::var("PIX_MERCHANT_NAME").ok(),
            merchant_city: env::var("PIX_MERCHANT_CITY").ok(),
        }
    }
}
