//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses per path and records every request line so tests
//! can assert how often a URL was actually hit.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: String,
    /// If false, HEAD returns 405 (simulates servers that block HEAD).
    pub head_allowed: bool,
    /// When set, answers with a 302 to this path instead.
    pub redirect_to: Option<String>,
}

impl Route {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            head_allowed: true,
            redirect_to: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::ok("")
        }
    }

    pub fn no_head(mut self) -> Self {
        self.head_allowed = false;
        self
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            redirect_to: Some(to.to_string()),
            ..Self::status(302)
        }
    }
}

pub struct TestServer {
    base: String,
    hits: Arc<Mutex<Vec<(String, String)>>>,
}

impl TestServer {
    /// Full URL for `path` (which starts with '/').
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Number of requests with `method` for `path`.
    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().len()
    }
}

/// Starts a server in a background thread. Unrouted paths get 404. The server
/// runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(Vec::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{port}"),
        hits,
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, hits: &Mutex<Vec<(String, String)>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("/").to_string();
    hits.lock().unwrap().push((method.clone(), path.clone()));

    let route = routes.get(&path).cloned().unwrap_or_else(|| Route::status(404));
    let is_head = method.eq_ignore_ascii_case("HEAD");
    if is_head && !route.head_allowed {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }

    let location = route
        .redirect_to
        .as_deref()
        .map(|to| format!("Location: {to}\r\n"))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        route.status,
        reason(route.status),
        route.body.len(),
        location
    );
    let _ = stream.write_all(head.as_bytes());
    if !is_head {
        let _ = stream.write_all(route.body.as_bytes());
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
