//! Where the bill API lives.

/// Environment variable that overrides the API host.
pub const API_BASE_ENV: &str = "QUICKBILL_API_BASE";

/// Host used when nothing overrides it.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/";

const RESOURCE_PATH: &str = "api/bills";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Scheme, host and port, e.g. `http://localhost:8080/`.
    pub api_base: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl GatewayConfig {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.to_string(),
        }
    }

    /// Read `QUICKBILL_API_BASE`, falling back to the default host. Blank
    /// values count as unset.
    pub fn from_env() -> Self {
        match std::env::var(API_BASE_ENV) {
            Ok(base) if !base.trim().is_empty() => Self::new(base.trim()),
            _ => Self::default(),
        }
    }

    /// Root URL of the bill resource, without a trailing slash.
    pub fn endpoint(&self) -> String {
        format!("{}/{RESOURCE_PATH}", self.api_base.trim_end_matches('/'))
    }
}
