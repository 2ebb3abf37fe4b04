//! Command-line and environment configuration.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

use docgate_core::page::StoreLimitPolicy;

const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

/// docgate - query document collections over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "docgate")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "DOCGATE_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// Key clients must send in the `X-API-Key` header. Requests are not checked when unset.
    #[arg(long, env = "DOCGATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// How many documents to ask the store for when paging
    #[arg(long, env = "DOCGATE_STORE_LIMIT", default_value_t = StoreLimitPolicy::default())]
    pub store_limit: StoreLimitPolicy,

    /// Document store to serve
    #[arg(long, value_enum, env = "DOCGATE_BACKEND", default_value_t = BackendKind::Memory)]
    pub backend: BackendKind,

    /// MongoDB connection string
    #[cfg(feature = "mongodb")]
    #[arg(long, env = "DOCGATE_MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database holding the collections
    #[cfg(feature = "mongodb")]
    #[arg(long, env = "DOCGATE_MONGODB_DATABASE", default_value = "docgate")]
    pub mongodb_database: String,
}

impl Args {
    /// The configured API key, treating an empty value as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    #[cfg(feature = "mongodb")]
    Mongodb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["docgate"]).unwrap();

        assert_eq!(args.listen, DEFAULT_LISTEN.parse::<SocketAddr>().unwrap());
        assert_eq!(args.store_limit, StoreLimitPolicy::OffsetPlusLimit);
        assert_eq!(args.backend, BackendKind::Memory);
    }

    #[test]
    fn parses_store_limit_and_key() {
        let args = Args::try_parse_from([
            "docgate",
            "--store-limit",
            "limit-only",
            "--api-key",
            "secret",
            "--listen",
            "127.0.0.1:9000",
        ])
        .unwrap();

        assert_eq!(args.store_limit, StoreLimitPolicy::LimitOnly);
        assert_eq!(args.api_key(), Some("secret"));
        assert_eq!(args.listen.port(), 9000);
    }

    #[test]
    fn empty_api_key_disables_the_gate() {
        let args = Args::try_parse_from(["docgate", "--api-key", ""]).unwrap();
        assert_eq!(args.api_key(), None);
    }

    #[test]
    fn rejects_unknown_store_limit() {
        assert!(Args::try_parse_from(["docgate", "--store-limit", "everything"]).is_err());
    }
}
