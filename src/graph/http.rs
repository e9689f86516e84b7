use crate::graph::{GraphError, GraphService, Page};
use crate::model::{AccountId, AccountSummary, Credential, PostRecord};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::DateTime;
use maplit::hashmap;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const TIMEOUT_SEC: u64 = 10;
const API_KEY_HEADER: &str = "x-api-key";

/// reqwest-backed GraphService. One instance per credential; credentials are
/// independent rate-limit domains, so clients are never shared across workers.
#[derive(Clone)]
pub struct HttpGraphService {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GraphResponse<T> {
    Ok(T),
    // Detect the case where the API returns 200, but contains errors
    #[allow(unused)]
    Error { errors: serde_json::Value },
}

// `meta` stays required: an error envelope has no `meta`, so the untagged
// Ok arm fails and the body falls through to GraphResponse::Error.
#[derive(Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    data: Vec<ApiPost>,
    meta: PageMeta,
}

#[derive(Deserialize)]
struct ApiPost {
    id: String,
    author_id: String,
    author_handle: String,
    created_at: String,
    text: String,
}

#[derive(Deserialize)]
struct AccountListResponse {
    #[serde(default)]
    data: Vec<AccountSummary>,
    meta: PageMeta,
}

#[derive(Deserialize)]
struct PageMeta {
    next_cursor: Option<String>,
}

impl HttpGraphService {
    pub fn new(mut base: Url, credential: &Credential) -> anyhow::Result<Self> {
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let mut headers = HeaderMap::new();
        let value = format!("Bearer {}", credential.secret);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&value)?);
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(&credential.key)?);
        Ok(Self {
            client: Client::builder()
                .default_headers(headers)
                .timeout(Duration::from_secs(TIMEOUT_SEC))
                .build()?,
            base,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &HashMap<&str, String>,
    ) -> Result<T, GraphError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| GraphError::Transient(e.into()))?;
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| GraphError::Transient(e.into()))?;
        deserialize_response(response).await
    }

    async fn fetch_account_page(
        &self,
        path: String,
        cursor: Option<String>,
    ) -> Result<Page<AccountSummary>, GraphError> {
        let mut query = hashmap! {};
        if let Some(cursor) = cursor {
            query.insert("cursor", cursor);
        }
        let response = self.get::<AccountListResponse>(&path, &query).await?;
        Ok(Page {
            items: response.data,
            next_cursor: response.meta.next_cursor,
        })
    }
}

async fn deserialize_response<T: DeserializeOwned>(response: Response) -> Result<T, GraphError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(GraphError::RateLimited);
    }
    let text = response
        .text()
        .await
        .map_err(|e| GraphError::Transient(anyhow!(e).context("Bad response text")))?;
    if !status.is_success() {
        let code = status.as_u16();
        return Err(GraphError::Transient(anyhow!(
            "Response was not successful: {code}\n{text}"
        )));
    }
    let parsed = serde_json::from_str::<GraphResponse<T>>(&text)
        .map_err(|e| GraphError::Transient(anyhow!(e).context("Unable to deserialize response")))?;
    match parsed {
        GraphResponse::Ok(ok) => Ok(ok),
        GraphResponse::Error { .. } => Err(GraphError::Transient(anyhow!("{text}"))),
    }
}

fn convert_post(post: ApiPost) -> anyhow::Result<PostRecord> {
    let created_at = DateTime::parse_from_rfc3339(&post.created_at)
        .with_context(|| format!("Bad created_at on post {}", post.id))?
        .timestamp();
    Ok(PostRecord {
        id: post.id,
        author_id: AccountId(post.author_id),
        author_handle: post.author_handle,
        created_at,
        text: post.text,
    })
}

#[async_trait]
impl GraphService for HttpGraphService {
    async fn fetch_timeline_page(
        &self,
        id: &AccountId,
        page_size: usize,
        cursor: Option<String>,
    ) -> Result<Page<PostRecord>, GraphError> {
        let mut query = hashmap! {
            "page_size" => page_size.to_string(),
        };
        if let Some(cursor) = cursor {
            query.insert("cursor", cursor);
        }
        let response = self
            .get::<TimelineResponse>(&format!("accounts/{id}/posts"), &query)
            .await?;
        let items = response
            .data
            .into_iter()
            .map(convert_post)
            .collect::<anyhow::Result<_>>()
            .map_err(GraphError::Transient)?;
        Ok(Page {
            items,
            next_cursor: response.meta.next_cursor,
        })
    }

    async fn fetch_followers_page(
        &self,
        id: &AccountId,
        cursor: Option<String>,
    ) -> Result<Page<AccountSummary>, GraphError> {
        self.fetch_account_page(format!("accounts/{id}/followers"), cursor)
            .await
    }

    async fn fetch_friends_page(
        &self,
        id: &AccountId,
        cursor: Option<String>,
    ) -> Result<Page<AccountSummary>, GraphError> {
        self.fetch_account_page(format!("accounts/{id}/friends"), cursor)
            .await
    }
}
