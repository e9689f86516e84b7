//! Shared test doubles: a scriptable GraphService and an in-memory sink.

use crate::graph::{GraphError, GraphService, Page};
use crate::model::{AccountId, AccountSummary, PostRecord};
use crate::sink::PersistenceSink;
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::ops::Range;
use std::sync::Mutex;

/// Serves pre-scripted pages per account. Cursors are page indices; unknown
/// accounts get a single empty page. `fail_next` makes the next fetch for an
/// account rate-limit once.
#[derive(Default)]
pub struct MockGraph {
    posts: Mutex<HashMap<String, Vec<Vec<PostRecord>>>>,
    friends: Mutex<HashMap<String, Vec<Vec<AccountSummary>>>>,
    followers: Mutex<HashMap<String, Vec<Vec<AccountSummary>>>>,
    fail_once: Mutex<HashSet<String>>,
    /// Distinct account ids that have had any page fetched.
    pub fetched: Mutex<HashSet<String>>,
}

impl MockGraph {
    pub fn add_posts(&self, id: &str, pages: Vec<Vec<PostRecord>>) {
        self.posts.lock().unwrap().insert(id.to_string(), pages);
    }

    pub fn add_friends(&self, id: &str, pages: Vec<Vec<AccountSummary>>) {
        self.friends.lock().unwrap().insert(id.to_string(), pages);
    }

    pub fn add_followers(&self, id: &str, pages: Vec<Vec<AccountSummary>>) {
        self.followers.lock().unwrap().insert(id.to_string(), pages);
    }

    pub fn fail_next(&self, id: &str) {
        self.fail_once.lock().unwrap().insert(id.to_string());
    }

    fn before_fetch(&self, id: &AccountId) -> Result<(), GraphError> {
        self.fetched.lock().unwrap().insert(id.0.clone());
        if self.fail_once.lock().unwrap().remove(&id.0) {
            return Err(GraphError::RateLimited);
        }
        Ok(())
    }
}

fn page_of<T: Clone>(
    pages: &Mutex<HashMap<String, Vec<Vec<T>>>>,
    id: &AccountId,
    cursor: Option<String>,
) -> Result<Page<T>, GraphError> {
    let index: usize = match cursor {
        Some(c) => c
            .parse()
            .map_err(|_| GraphError::Transient(anyhow!("bad cursor: {c}")))?,
        None => 0,
    };
    let pages = pages.lock().unwrap();
    let scripted = pages.get(&id.0);
    let items = scripted
        .and_then(|p| p.get(index))
        .cloned()
        .unwrap_or_default();
    let more = scripted.map_or(false, |p| index + 1 < p.len());
    Ok(Page {
        items,
        next_cursor: more.then(|| (index + 1).to_string()),
    })
}

#[async_trait]
impl GraphService for MockGraph {
    async fn fetch_timeline_page(
        &self,
        id: &AccountId,
        _page_size: usize,
        cursor: Option<String>,
    ) -> Result<Page<PostRecord>, GraphError> {
        self.before_fetch(id)?;
        page_of(&self.posts, id, cursor)
    }

    async fn fetch_followers_page(
        &self,
        id: &AccountId,
        cursor: Option<String>,
    ) -> Result<Page<AccountSummary>, GraphError> {
        self.before_fetch(id)?;
        page_of(&self.followers, id, cursor)
    }

    async fn fetch_friends_page(
        &self,
        id: &AccountId,
        cursor: Option<String>,
    ) -> Result<Page<AccountSummary>, GraphError> {
        self.before_fetch(id)?;
        page_of(&self.friends, id, cursor)
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub posts: Mutex<Vec<PostRecord>>,
    pub ids: Mutex<Vec<AccountId>>,
}

#[async_trait]
impl PersistenceSink for MemorySink {
    async fn append_posts(&self, batch: &[PostRecord]) -> io::Result<()> {
        self.posts.lock().unwrap().extend_from_slice(batch);
        Ok(())
    }

    async fn append_account_ids(&self, ids: &[AccountId]) -> io::Result<()> {
        self.ids.lock().unwrap().extend_from_slice(ids);
        Ok(())
    }
}

pub fn posts(author: &str, range: Range<usize>) -> Vec<PostRecord> {
    range
        .map(|i| PostRecord {
            id: format!("{author}-post-{i}"),
            author_id: AccountId::from(author),
            author_handle: format!("@{author}"),
            created_at: 1_600_000_000 + i as i64,
            text: format!("post {i}"),
        })
        .collect()
}

pub fn eligible_accounts(prefix: &str, count: usize) -> Vec<AccountSummary> {
    (0..count)
        .map(|i| AccountSummary {
            id: AccountId(format!("{prefix}-{i}")),
            followers_count: 100,
            following_count: 1000,
            posts_count: 5000,
        })
        .collect()
}

pub fn ineligible_account(id: &str) -> AccountSummary {
    AccountSummary {
        id: AccountId::from(id),
        followers_count: 50_000,
        following_count: 1000,
        posts_count: 5000,
    }
}
