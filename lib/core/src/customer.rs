use serde::{Deserialize, Serialize};

/// Customer identifier - either numeric or free-form, matching whatever the
/// source system uses. Identity is exact: `Integer(42)` and `String("42")`
/// are distinct customers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    Integer(u64),
    String(String),
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerId::Integer(i) => write!(f, "{}", i),
            CustomerId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for CustomerId {
    fn from(i: u64) -> Self {
        CustomerId::Integer(i)
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        CustomerId::String(s)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        CustomerId::String(s.to_string())
    }
}
