// ⚙️ Configuration - environment first, CLI flags override
//
// SECARDS_DATA   path to a cards JSON file (bundled dataset when unset)
// SECARDS_BIND   HTTP bind address (default 0.0.0.0)
// SECARDS_PORT   HTTP port (default 3000)
// RUST_LOG       tracing filter (default "secards=info,warn")

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_FILTER: &str = "secards=info,warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: Option<PathBuf>,
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: None,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to the defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let data_path = lookup("SECARDS_DATA")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let bind = lookup("SECARDS_BIND")
            .and_then(|b| b.parse().ok())
            .unwrap_or(defaults.bind);

        let port = lookup("SECARDS_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Config { data_path, bind, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Install the global tracing subscriber (logs go to stderr)
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
