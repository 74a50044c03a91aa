use std::fmt;

/// Opaque identifier of a purchasable product, assigned by the storefront
/// backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IapProductId(pub String);

impl IapProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IapProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IapProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for IapProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
