use crate::config::IapConfig;

/// Which verification endpoint a receipt is currently being posted to.
/// Scoped to a single verification attempt; never persisted across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyEnvironment {
    Production,
    Sandbox,
}

impl VerifyEnvironment {
    /// Number of distinct environments, which bounds the endpoint-retry
    /// loop.
    pub const COUNT: usize = 2;

    pub fn url<'a>(&self, config: &'a IapConfig) -> &'a str {
        match self {
            Self::Production => &config.production_verify_url,
            Self::Sandbox => &config.sandbox_verify_url,
        }
    }

    /// The other environment, tried after a mismatch response.
    pub fn switched(self) -> Self {
        match self {
            Self::Production => Self::Sandbox,
            Self::Sandbox => Self::Production,
        }
    }
}
