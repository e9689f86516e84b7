use crate::model::{AccountId, PostRecord};
use async_trait::async_trait;
use std::borrow::Cow;
use std::io;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only output boundary. Implementations must serialize their own
/// writes; callers append whole batches and never coordinate with each other.
/// Duplicate rows across batches are expected and not the sink's problem.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn append_posts(&self, batch: &[PostRecord]) -> io::Result<()>;
    async fn append_account_ids(&self, ids: &[AccountId]) -> io::Result<()>;
}

/// File-backed sink: posts as CSV rows, discovered ids newline-delimited.
/// One lock per target file keeps interleaved worker appends row-atomic.
pub struct FileSink {
    posts: Mutex<File>,
    ids: Mutex<File>,
}

impl FileSink {
    pub async fn open(posts_path: &Path, ids_path: &Path) -> io::Result<Self> {
        Ok(Self {
            posts: Mutex::new(open_append(posts_path).await?),
            ids: Mutex::new(open_append(ids_path).await?),
        })
    }
}

async fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    OpenOptions::new().create(true).append(true).open(path).await
}

// Column order: id, author_id, author_handle, created_at, text.
fn post_row(post: &PostRecord) -> String {
    format!(
        "{},{},{},{},{}\n",
        csv_field(&post.id),
        csv_field(&post.author_id.0),
        csv_field(&post.author_handle),
        post.created_at,
        csv_field(&post.text),
    )
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains(['"', ',', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

#[async_trait]
impl PersistenceSink for FileSink {
    async fn append_posts(&self, batch: &[PostRecord]) -> io::Result<()> {
        let rows: String = batch.iter().map(post_row).collect();
        let mut file = self.posts.lock().await;
        file.write_all(rows.as_bytes()).await?;
        file.flush().await
    }

    async fn append_account_ids(&self, ids: &[AccountId]) -> io::Result<()> {
        let mut lines = String::new();
        for id in ids {
            lines.push_str(&id.0);
            lines.push('\n');
        }
        let mut file = self.ids.lock().await;
        file.write_all(lines.as_bytes()).await?;
        file.flush().await
    }
}
