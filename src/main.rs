//! Loads one list view from the backend and prints the filtered rows.
//!
//! Usage: `study-filter <study|assay|program|user> [query] [--user <id>]`

use anyhow::{Context, bail};
use serde::Serialize;
use std::sync::Arc;
use study_filter::{
    Config, HttpBackend, ListEntity, ListView, NavigationSink,
    model::{Assay, Program, Study, User},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct LogNavigation;

impl NavigationSink for LogNavigation {
    fn push_query(&self, query: &str) {
        info!(query = %query, "navigate");
    }
}

struct Args {
    entity: String,
    query: String,
    user: Option<i64>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut entity = None;
    let mut query = None;
    let mut user = None;
    while let Some(arg) = args.next() {
        if arg == "--user" {
            let id = args.next().context("--user needs a value")?;
            user = Some(id.parse().with_context(|| format!("invalid user id: {id}"))?);
        } else if entity.is_none() {
            entity = Some(arg);
        } else if query.is_none() {
            query = Some(arg);
        } else {
            bail!("unexpected argument: {arg}");
        }
    }
    Ok(Args {
        entity: entity.context("usage: study-filter <study|assay|program|user> [query] [--user <id>]")?,
        query: query.unwrap_or_default(),
        user,
    })
}

async fn run<T>(config: Arc<Config>, args: &Args) -> anyhow::Result<()>
where
    T: ListEntity + Serialize,
{
    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let view = ListView::<T>::new(backend, config, Arc::new(LogNavigation))
        .with_current_user(args.user);
    view.mount(&args.query)
        .await
        .with_context(|| format!("failed to load {} list", T::NAME))?;

    if let Some(query) = view.query_string() {
        println!("?{query}");
    }
    for row in view.results().unwrap_or_default().iter() {
        println!("{}", serde_json::to_string(row.as_ref())?);
    }
    if let Some(stats) = view.stats() {
        info!(total = stats.source_len, visible = stats.visible_len, "done");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_filter=info".into()),
        )
        .init();

    let args = parse_args()?;
    let config = Arc::new(Config::load()?);

    match args.entity.as_str() {
        "study" => run::<Study>(config, &args).await,
        "assay" => run::<Assay>(config, &args).await,
        "program" => run::<Program>(config, &args).await,
        "user" => run::<User>(config, &args).await,
        other => bail!("unknown entity: {other}"),
    }
}
