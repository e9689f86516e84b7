pub mod http;

use crate::model::{AccountId, AccountSummary, PostRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Upstream failure kinds. The worker treats both identically (drop the
/// current unit of work and back off); they are distinguished only for logs.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("upstream rate limit exhausted")]
    RateLimited,
    #[error("transient upstream failure: {0:#}")]
    Transient(anyhow::Error),
}

/// One page of results. `next_cursor` of `None` means the listing is
/// exhausted, which is normal loop termination, not an error.
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

#[async_trait]
pub trait GraphService: Send + Sync {
    async fn fetch_timeline_page(
        &self,
        id: &AccountId,
        page_size: usize,
        cursor: Option<String>,
    ) -> Result<Page<PostRecord>, GraphError>;

    async fn fetch_followers_page(
        &self,
        id: &AccountId,
        cursor: Option<String>,
    ) -> Result<Page<AccountSummary>, GraphError>;

    async fn fetch_friends_page(
        &self,
        id: &AccountId,
        cursor: Option<String>,
    ) -> Result<Page<AccountSummary>, GraphError>;
}
