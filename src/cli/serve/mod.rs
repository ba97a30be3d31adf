//! Static file server for the generated console resources.

mod lifecycle;
mod path;
mod response;

use lifecycle::{DEFAULT_PORT, port_from_env};

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tiny_http::{Method, Request, Server};

use crate::{config::HalConfig, core::register_server, debug, log};

/// Serve the configured directory until Ctrl+C.
pub fn serve(config: &HalConfig) -> Result<()> {
    let root = config.serve_dir();
    if !root.is_dir() {
        bail!(
            "serve directory not found: {} (run `hal-assets run` first)",
            config.root_relative(&root).display()
        );
    }
    let port = config
        .serve
        .port
        .unwrap_or_else(|| port_from_env(DEFAULT_PORT));

    StaticServer::bind(config.serve.interface, port, root)?.run()
}

/// Bound server ready to accept requests.
pub struct StaticServer {
    server: Arc<Server>,
    addr: SocketAddr,
    root: PathBuf,
}

impl StaticServer {
    pub fn bind(interface: IpAddr, port: u16, root: PathBuf) -> Result<Self> {
        let (server, addr) = lifecycle::bind(interface, port)?;
        Ok(Self {
            server: Arc::new(server),
            addr,
            root,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the request loop (blocking) until the server is unblocked.
    pub fn run(self) -> Result<()> {
        register_server(Arc::clone(&self.server));
        log!("serve"; "http://{} ({})", self.addr(), self.root.display());
        serve_requests(&self.server, &self.root)
    }
}

fn serve_requests(server: &Server, root: &Path) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("Failed to create request thread pool")?;
    let root = Arc::new(root.to_path_buf());

    for request in server.incoming_requests() {
        let root = Arc::clone(&root);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &root) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, root: &Path) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    debug!("serve"; "{} {}", request.method(), request.url());
    match path::resolve_path(request.url(), root) {
        Some(file) => response::respond_file(request, &file),
        None => response::respond_not_found(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::{Ipv4Addr, TcpStream};
    use std::thread::{self, JoinHandle};
    use tempfile::TempDir;

    struct Running {
        server: Arc<Server>,
        addr: SocketAddr,
        handle: Option<JoinHandle<()>>,
        _dir: TempDir,
    }

    impl Drop for Running {
        fn drop(&mut self) {
            self.server.unblock();
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }

    fn start() -> Running {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("public");
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("index.html"), "<h1>HAL</h1>").unwrap();
        fs::write(root.join("css/hal.css"), ".a{}").unwrap();
        fs::write(dir.path().join("secret.txt"), "secret").unwrap();

        let bound = StaticServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, root).unwrap();
        let server = Arc::clone(&bound.server);
        let addr = bound.addr();
        let handle = thread::spawn(move || {
            serve_requests(&bound.server, &bound.root).unwrap();
        });

        Running {
            server,
            addr,
            handle: Some(handle),
            _dir: dir,
        }
    }

    /// Send a raw HTTP/1.0 request, returning (status, head, body).
    fn send(addr: SocketAddr, method: &str, url: &str) -> (u16, String, String) {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "{method} {url} HTTP/1.0\r\nHost: localhost\r\nConnection: close\r\n\r\n"
        )
        .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).unwrap();

        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        let status = head.split(' ').nth(1).unwrap().parse().unwrap();
        (status, head.to_ascii_lowercase(), body.to_string())
    }

    #[test]
    fn test_get_file() {
        let running = start();
        let (status, head, body) = send(running.addr, "GET", "/css/hal.css?v=2");
        assert_eq!(status, 200);
        assert!(head.contains("content-type: text/css"));
        assert_eq!(body, ".a{}");
    }

    #[test]
    fn test_directory_index() {
        let running = start();
        let (status, head, body) = send(running.addr, "GET", "/");
        assert_eq!(status, 200);
        assert!(head.contains("content-type: text/html"));
        assert_eq!(body, "<h1>HAL</h1>");
    }

    #[test]
    fn test_head_has_no_body() {
        let running = start();
        let (status, head, body) = send(running.addr, "HEAD", "/css/hal.css");
        assert_eq!(status, 200);
        assert!(head.contains("content-type: text/css"));
        assert!(body.is_empty());
    }

    #[test]
    fn test_not_found() {
        let running = start();
        let (status, _, body) = send(running.addr, "GET", "/missing.js");
        assert_eq!(status, 404);
        assert_eq!(body, "404 Not Found");
    }

    #[test]
    fn test_traversal_is_not_found() {
        let running = start();
        let (status, _, body) = send(running.addr, "GET", "/%2e%2e/secret.txt");
        assert_eq!(status, 404);
        assert!(!body.contains("secret"));
    }

    #[test]
    fn test_method_not_allowed() {
        let running = start();
        let (status, head, _) = send(running.addr, "POST", "/index.html");
        assert_eq!(status, 405);
        assert!(head.contains("allow: get, head"));
    }
}
