//! One-shot ingest-and-adapt run, for cron.
//!
//! Usage: `ingest [--domain real_estate|tech|<brand>] [--max-items N] [--skip-adapt]`

use std::sync::Arc;

use anyhow::{Context, bail};
use newsdesk::{
    brands::{Domain, domain_for_brand},
    config::{Config, SourcesConfig},
    fetcher::HttpFeedFetcher,
    ingest::Pipeline,
    repositories::PgNewsRepository,
    telemetry,
};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Args {
    domain: Option<Domain>,
    max_items: Option<usize>,
    skip_adapt: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--domain" => {
                let value = args.next().context("--domain needs a value")?;
                let domain = Domain::parse(&value)
                    .or_else(|| domain_for_brand(&value))
                    .with_context(|| format!("unknown domain: {value}"))?;
                parsed.domain = Some(domain);
            }
            "--max-items" => {
                let value = args.next().context("--max-items needs a value")?;
                let max_items: usize = value
                    .parse()
                    .with_context(|| format!("invalid --max-items: {value}"))?;
                if max_items == 0 {
                    bail!("--max-items must be positive");
                }
                parsed.max_items = Some(max_items);
            }
            "--skip-adapt" => parsed.skip_adapt = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let args = parse_args(std::env::args().skip(1))?;

    let config = Config::from_env()?;
    let mut catalogue = SourcesConfig::load(config.sources_path(), config.default_max_items())?;
    if let Some(max_items) = args.max_items {
        catalogue = catalogue.with_cap(max_items);
    }
    let sources = catalogue.select(args.domain);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(config.database_url())
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let pipeline = Pipeline::new(
        Arc::new(HttpFeedFetcher::with_timeout(config.fetch_timeout())?),
        Arc::new(PgNewsRepository::new(pool)),
    )
    .with_concurrency(config.fetch_concurrency());

    let report = pipeline.ingest(&sources).await?;
    for (source, outcome) in &report.sources {
        if outcome.fetch_failed {
            warn!(%source, "feed could not be fetched");
        }
    }

    let adapted = if args.skip_adapt {
        0
    } else {
        pipeline.adapt_pending().await?
    };

    let summary = newsdesk::ingest::IngestAndAdaptSummary::new(report, adapted);
    info!(message = %summary.message, "run finished");
    println!("{}", summary.message);
    Ok(())
}
