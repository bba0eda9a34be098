//! Configuration for the Catalog API

use std::net::{IpAddr, SocketAddr};

/// Application configuration, loaded from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_vars(std::env::var("HOST").ok(), std::env::var("PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> eyre::Result<Self> {
        let host: IpAddr = host
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse()
            .map_err(|e| eyre::eyre!("Invalid HOST: {e}"))?;

        let port: u16 = port
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| eyre::eyre!("Invalid PORT: {e}"))?;

        Ok(Self { host, port })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
