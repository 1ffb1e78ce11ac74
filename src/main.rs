use clap::Parser;
use student_directory::config::{CliArgs, ServiceConfig, StoreConfig};
use student_directory::store::{MemoryStore, MongoStore};
use student_directory::{Server, app, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServiceConfig::try_from(args)?;

    telemetry::init()?;

    let server = Server::bind(config.server_addr);
    match config.store {
        StoreConfig::Mongo { url, database, collection } => {
            let store = MongoStore::connect(&url, &database, &collection).await?;
            info!(%database, %collection, "using mongo store");
            server.serve(app::router(store)).await?;
        }
        StoreConfig::Memory => {
            warn!("using in-memory store; records are lost on exit");
            server.serve(app::router(MemoryStore::new())).await?;
        }
    }

    Ok(())
}
