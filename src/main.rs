mod collector;
mod crawl;
mod graph;
mod model;
mod queue;
mod sink;
#[cfg(test)]
mod testutil;
mod worker;

use clap::Parser;
use std::path::PathBuf;
use url::Url;
use worker::Mode;

#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Harvest recent posts for each seeded account
    Posts(CrawlArgs),
    /// Expand the frontier by sampling each account's connections
    Discover(CrawlArgs),
}

#[derive(clap::Args, Debug)]
pub struct CrawlArgs {
    /// Base URL of the social-graph API
    #[clap(long)]
    api_base: Url,
    /// Credentials file, one key,secret pair per line (one worker each)
    #[clap(long, default_value = "./tokens.txt")]
    credentials: PathBuf,
    /// Newline-delimited seed account ids
    #[clap(long)]
    seeds: Option<PathBuf>,
    /// Where post batches are appended
    #[clap(long, default_value = "./data/posts.csv")]
    posts_out: PathBuf,
    /// Where discovered account ids are appended
    #[clap(long, default_value = "./data/accounts.txt")]
    ids_out: PathBuf,
    /// Skip accounts already discovered during this run
    #[clap(long)]
    dedup: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    if let Err(e) = main2().await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn main2() -> anyhow::Result<()> {
    let args: Args = Args::parse();
    match args.command {
        Command::Posts(args) => crawl::run(Mode::Posts, args).await,
        Command::Discover(args) => crawl::run(Mode::Discover, args).await,
    }
}
