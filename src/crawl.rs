use crate::collector::Collector;
use crate::graph::http::HttpGraphService;
use crate::model::{AccountId, Credential};
use crate::queue::FrontierQueue;
use crate::sink::{FileSink, PersistenceSink};
use crate::worker::{Mode, VisitedSet, Worker};
use crate::CrawlArgs;
use anyhow::{bail, Context};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::fs;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

// Default frontier for discovery when no seeds file is given.
const BOOTSTRAP_SEEDS: [&str; 5] = [
    "537439729",
    "181269400",
    "327487581",
    "1417290926",
    "504813703",
];

pub async fn run(mode: Mode, args: CrawlArgs) -> anyhow::Result<()> {
    let contents = fs::read_to_string(&args.credentials)
        .await
        .context("Unable to read credentials file")?;
    let credentials = parse_credentials(&contents)?;

    let seeds = match &args.seeds {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .await
                .context("Unable to read seeds file")?;
            parse_seeds(&contents)
        }
        None if mode == Mode::Discover => bootstrap_seeds(),
        None => bail!("Post harvesting requires --seeds"),
    };
    if seeds.is_empty() {
        bail!("No seed account ids provided");
    }

    let queue = Arc::new(FrontierQueue::new());
    queue.push_all(seeds);

    let sink: Arc<dyn PersistenceSink> = Arc::new(
        FileSink::open(&args.posts_out, &args.ids_out)
            .await
            .context("Unable to open output files")?,
    );
    let visited: Option<VisitedSet> = args
        .dedup
        .then(|| Arc::new(Mutex::new(HashSet::new())));
    let cancel = CancellationToken::new();

    let mut workers = JoinSet::new();
    for (i, credential) in credentials.iter().enumerate() {
        let graph = HttpGraphService::new(args.api_base.clone(), credential)
            .context("Unable to build API client")?;
        let worker = Worker {
            name: format!("worker-{i}"),
            collector: Collector::new(Arc::new(graph)),
            queue: queue.clone(),
            sink: sink.clone(),
            mode,
            visited: visited.clone(),
            cancel: cancel.clone(),
        };
        workers.spawn(worker.run());
    }
    log::info!(
        "Started {} workers in {:?} mode with {} queued seeds",
        workers.len(),
        mode,
        queue.len()
    );

    tokio::signal::ctrl_c()
        .await
        .context("Unable to listen for shutdown signal")?;
    log::info!("Shutting down");
    cancel.cancel();
    while workers.join_next().await.is_some() {}
    Ok(())
}

/// One `key,secret` pair per line. Any malformed line is fatal.
fn parse_credentials(contents: &str) -> anyhow::Result<Vec<Credential>> {
    let mut credentials = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, secret) = line
            .split_once(',')
            .with_context(|| format!("Malformed credential on line {}", number + 1))?;
        if key.is_empty() || secret.is_empty() {
            bail!("Malformed credential on line {}", number + 1);
        }
        credentials.push(Credential {
            key: key.to_string(),
            secret: secret.to_string(),
        });
    }
    if credentials.is_empty() {
        bail!("No credentials provided");
    }
    Ok(credentials)
}

fn parse_seeds(contents: &str) -> Vec<AccountId> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(AccountId::from)
        .collect()
}

fn bootstrap_seeds() -> Vec<AccountId> {
    BOOTSTRAP_SEEDS.iter().map(|&s| AccountId::from(s)).collect()
}
