//! Server Configuration

use show_core::StripeConfiguration;
use show_core::draft::{DEFAULT_ALLOWED_COUNTRIES, parse_countries};

/// Runtime settings read from the environment (after `.env` is loaded)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Directory holding the built WASM frontend
    pub static_dir: String,
    /// Stripe credentials supplied at boot; admins can also set them later
    pub stripe: Option<StripeConfiguration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            static_dir: "static".into(),
            stripe: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let stripe = lookup("STRIPE_SECRET_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|secret_key| StripeConfiguration {
                secret_key,
                allowed_countries: parse_countries(
                    &lookup("STRIPE_ALLOWED_COUNTRIES")
                        .unwrap_or_else(|| DEFAULT_ALLOWED_COUNTRIES.into()),
                ),
            });

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            static_dir: lookup("STATIC_DIR").unwrap_or(defaults.static_dir),
            stripe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.static_dir, "static");
        assert!(config.stripe.is_none());
    }

    #[test]
    fn test_stripe_from_env() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ]);
        let config = ServerConfig::from_lookup(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        let stripe = config.stripe.unwrap();
        assert_eq!(stripe.secret_key, "sk_test_123");
        assert_eq!(stripe.allowed_countries, vec!["US", "CA", "GB"]);
    }
}
