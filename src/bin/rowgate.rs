//! rowgate CLI — insert a batch of rows through the admission gate.

use clap::Parser;
use rowgate::config::Config;
use rowgate::engine::Engine;
use rowgate::model::WorkItem;
use rowgate::store::{PgStore, Store as _};
use rowgate::telemetry::init_logging;
use secrecy::ExposeSecret;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "rowgate",
    about = "Admission-gated concurrent batch inserts into Postgres"
)]
struct Cli {
    /// Postgres connection URL (falls back to DATABASE_URL, then a
    /// local-dev default)
    #[arg(long)]
    dburl: Option<String>,

    /// Number of rows to insert
    #[arg(long, default_value_t = 2000)]
    count: u32,

    /// Connection pool size; also the gate's admission limit
    #[arg(long, default_value_t = 10)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::resolve(cli.dburl)?;
    init_logging(&config.log_level)?;

    let store = PgStore::connect(config.database_url.expose_secret(), cli.max_connections).await?;
    store.ensure_schema().await?;

    // Use the store's own reported maximum as the admission limit.
    let limit = store.current_usage().max;

    let items: Vec<WorkItem> = (1..=cli.count as i32)
        .map(|i| WorkItem::new(i, "TestBook", "TestDescription"))
        .collect();

    let engine = Engine::new(store, limit);
    match engine.run_batch(items).await {
        Ok(report) => {
            info!(
                items = report.items,
                elapsed = ?report.elapsed,
                "all inserts completed"
            );
            Ok(())
        }
        Err(e) => {
            error!("batch aborted: {e}");
            std::process::exit(1);
        }
    }
}
