pub mod filter;
pub mod sample;

use crate::graph::{GraphError, GraphService};
use crate::model::{AccountId, AccountSummary, PostRecord};
use std::sync::Arc;

const PAGE_SIZE: usize = 200;
const MAX_POSTS: usize = 3000;
const MAX_FRIENDS: usize = 50;
const MAX_FOLLOWERS: usize = 100;

/// Fetch-and-shape layer for one account at a time. Holds the worker's own
/// GraphService client; persistence and re-enqueueing stay with the caller.
pub struct Collector {
    graph: Arc<dyn GraphService>,
}

impl Collector {
    pub fn new(graph: Arc<dyn GraphService>) -> Self {
        Self { graph }
    }

    /// Pages through the account's timeline until 3000 posts are in hand or
    /// the service reports exhaustion.
    pub async fn get_posts(&self, id: &AccountId) -> Result<Vec<PostRecord>, GraphError> {
        log::info!("Getting posts for {}", id);
        let mut posts = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.graph.fetch_timeline_page(id, PAGE_SIZE, cursor).await?;
            posts.extend(page.items);
            if posts.len() >= MAX_POSTS || page.next_cursor.is_none() {
                break;
            }
            cursor = page.next_cursor;
        }
        posts.truncate(MAX_POSTS);
        Ok(posts)
    }

    /// Full friends and followers listings, filtered to potential targets and
    /// independently capped (50 friends, 100 followers). Friends first.
    pub async fn get_discovered_accounts(
        &self,
        id: &AccountId,
    ) -> Result<Vec<AccountId>, GraphError> {
        let followers = self.get_followers(id).await?;
        let friends = self.get_friends(id).await?;

        let mut discovered = sample::sample(friends, MAX_FRIENDS);
        discovered.extend(sample::sample(followers, MAX_FOLLOWERS));
        Ok(discovered)
    }

    async fn get_followers(&self, id: &AccountId) -> Result<Vec<AccountId>, GraphError> {
        log::info!("Getting followers for {}", id);
        let mut eligible = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.graph.fetch_followers_page(id, cursor).await?;
            eligible.extend(keep_eligible(page.items));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(eligible)
    }

    async fn get_friends(&self, id: &AccountId) -> Result<Vec<AccountId>, GraphError> {
        log::info!("Getting friends for {}", id);
        let mut eligible = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.graph.fetch_friends_page(id, cursor).await?;
            eligible.extend(keep_eligible(page.items));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(eligible)
    }
}

fn keep_eligible(accounts: Vec<AccountSummary>) -> impl Iterator<Item = AccountId> {
    accounts
        .into_iter()
        .filter(filter::is_potential_target)
        .map(|summary| summary.id)
}
