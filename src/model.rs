use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an account in the social graph. The crawler never
/// interprets it; the same value may sit in the frontier more than once.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_string())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        AccountId(s)
    }
}

/// Public counters for an account, used only for eligibility checks.
/// Never persisted.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub followers_count: u64,
    pub following_count: u64,
    pub posts_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub author_id: AccountId,
    pub author_handle: String,
    /// Unix timestamp, seconds.
    pub created_at: i64,
    pub text: String,
}

/// One API credential. Bound to exactly one worker for the whole run.
#[derive(Clone, Debug)]
pub struct Credential {
    pub key: String,
    pub secret: String,
}
