//! Server binding and port selection.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Result, anyhow};
use tiny_http::Server;

use crate::log;

/// Environment variable holding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Port used when neither config, CLI nor `$PORT` set one.
pub const DEFAULT_PORT: u16 = 3000;

/// Port from `$PORT`, falling back to `default`.
pub fn port_from_env(default: u16) -> u16 {
    parse_port(std::env::var(PORT_ENV).ok().as_deref(), default)
}

/// Parse a port value. Invalid values fall back to `default` with a warning.
fn parse_port(value: Option<&str>, default: u16) -> u16 {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return default;
    };
    match value.parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            log!("warning"; "invalid ${PORT_ENV} `{value}`, using {default}");
            default
        }
    }
}

/// Bind the HTTP server, returning it with the address actually bound
/// (which differs from the request when `port` is 0).
pub fn bind(interface: IpAddr, port: u16) -> Result<(Server, SocketAddr)> {
    let requested = SocketAddr::new(interface, port);
    let server =
        Server::http(requested).map_err(|e| anyhow!("Failed to bind {requested}: {e}"))?;
    let addr = server.server_addr().to_ip().unwrap_or(requested);
    Ok((server, addr))
}
