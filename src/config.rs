//! Process configuration.
//!
//! Every setting can come from a CLI flag or an environment variable; `main`
//! loads `.env` first, so a local `.env` file works too.

use std::net::SocketAddr;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};

/// Which [`StudentStore`](crate::store::StudentStore) backs the service.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StoreBackend {
    /// MongoDB at `MONGO_URL`.
    Mongo,
    /// In-process and non-persistent; for local runs.
    Memory,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "student-directory",
    version,
    about = "HTTP create/read/update/delete service for student records"
)]
pub struct CliArgs {
    /// MongoDB connection string. Required with the `mongo` backend.
    ///
    /// Environment variable: `MONGO_URL`
    #[arg(long, env = "MONGO_URL")]
    pub mongo_url: Option<String>,

    /// Database holding the student collection.
    ///
    /// Environment variable: `DATABASE_NAME`
    #[arg(long, env = "DATABASE_NAME", default_value = "student_management")]
    pub database_name: String,

    /// Collection holding student documents.
    ///
    /// Environment variable: `COLLECTION_NAME`
    #[arg(long, env = "COLLECTION_NAME", default_value = "students")]
    pub collection_name: String,

    /// `host:port` to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8000")]
    pub server_addr: String,

    /// Storage backend.
    ///
    /// Environment variable: `STORE_BACKEND`
    #[arg(long, env = "STORE_BACKEND", value_enum, default_value_t = StoreBackend::Mongo)]
    pub store_backend: StoreBackend,
}

/// Store connection settings, only what the chosen backend needs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StoreConfig {
    Mongo { url: String, database: String, collection: String },
    Memory,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub server_addr: SocketAddr,
    pub store: StoreConfig,
}

impl TryFrom<CliArgs> for ServiceConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let server_addr = args
            .server_addr
            .parse()
            .with_context(|| format!("SERVER_ADDR ({}) is not a valid host:port", args.server_addr))?;

        let store = match args.store_backend {
            StoreBackend::Memory => StoreConfig::Memory,
            StoreBackend::Mongo => {
                let Some(url) = args.mongo_url.filter(|u| !u.is_empty()) else {
                    bail!("MONGO_URL must be set when STORE_BACKEND is mongo");
                };
                StoreConfig::Mongo {
                    url,
                    database: args.database_name,
                    collection: args.collection_name,
                }
            }
        };

        Ok(Self { server_addr, store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["student-directory"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn mongo_backend_needs_a_url() {
        let err = ServiceConfig::try_from(args(&["--mongo-url", ""])).unwrap_err();
        assert!(err.to_string().contains("MONGO_URL"));
    }

    #[test]
    fn mongo_backend_carries_names() {
        let config = ServiceConfig::try_from(args(&[
            "--mongo-url", "mongodb://localhost:27017",
            "--database-name", "school",
        ]))
        .unwrap();
        assert_eq!(config.store, StoreConfig::Mongo {
            url: "mongodb://localhost:27017".into(),
            database: "school".into(),
            collection: "students".into(),
        });
    }

    #[test]
    fn memory_backend_ignores_url() {
        let config = ServiceConfig::try_from(args(&[
            "--store-backend", "memory",
            "--server-addr", "127.0.0.1:9000",
        ]))
        .unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.server_addr, "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn bad_addr_is_rejected() {
        let err = ServiceConfig::try_from(args(&["--store-backend", "memory", "--server-addr", "nope"]));
        assert!(err.is_err());
    }
}
