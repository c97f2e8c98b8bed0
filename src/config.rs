use std::env;

/// Store policy limits. The bounds are business rules, the numbers are
/// deployment policy, so they stay overridable from the environment.
#[derive(Debug, Clone, Copy)]
pub struct PolicyLimits {
    /// Inclusive upper bound for a single cart line quantity.
    pub max_cart_quantity: i32,
    /// Minimum accepted length of a contact message body, in characters.
    pub min_message_len: usize,
}

impl Default for PolicyLimits {
    fn default() -> Self {
        Self {
            max_cart_quantity: 100,
            min_message_len: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub limits: PolicyLimits,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let defaults = PolicyLimits::default();
        let limits = PolicyLimits {
            max_cart_quantity: env::var("CART_MAX_QUANTITY")
                .ok()
                .and_then(|v| v.parse::<i32>().ok())
                .filter(|v| *v >= 1)
                .unwrap_or(defaults.max_cart_quantity),
            min_message_len: env::var("CONTACT_MIN_MESSAGE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.min_message_len),
        };

        Ok(Self {
            database_url,
            host,
            port,
            limits,
        })
    }
}
