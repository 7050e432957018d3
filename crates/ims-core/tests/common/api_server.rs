//! Minimal HTTP/1.1 stand-in for the IMS backend used by integration tests.
//!
//! Serves `/api/auth/{login,refresh}` and `/api/inventory/items` from memory.
//! Every inventory call needs `Authorization: Bearer <current access token>`.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

pub const PASSWORD: &str = "rahsia123";

#[derive(Debug, Default)]
pub struct Backend {
    pub generation: u32,
    pub items: Vec<Value>,
    pub refresh_calls: u32,
    pub item_posts: u32,
    /// Delay before answering item writes, so tests can observe optimistic state.
    pub write_delay: Option<Duration>,
    /// Delay before answering a refresh, so concurrent 401s overlap with it.
    pub refresh_delay: Option<Duration>,
}

impl Backend {
    pub fn access_token(&self) -> String {
        format!("access-{}", self.generation)
    }

    pub fn refresh_token(&self) -> String {
        format!("refresh-{}", self.generation)
    }

    /// Invalidate the current access token without touching the refresh token.
    pub fn expire_access(&mut self) {
        self.generation += 1;
    }
}

pub type Shared = Arc<Mutex<Backend>>;

/// Start the server on an ephemeral port. Returns the API base URL and the shared state.
pub fn start() -> (String, Shared) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state: Shared = Arc::new(Mutex::new(Backend {
        generation: 1,
        ..Default::default()
    }));
    let server_state = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&server_state);
            thread::spawn(move || handle(stream, &state));
        }
    });
    (format!("http://127.0.0.1:{port}/api"), state)
}

struct Request {
    method: String,
    path: String,
    authorization: Option<String>,
    body: Value,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&buf[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?;
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut content_length = 0usize;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.to_string());
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = serde_json::from_slice(&buf[header_end..]).unwrap_or(Value::Null);
    Some(Request {
        method,
        path,
        authorization,
        body,
    })
}

fn respond(stream: &mut TcpStream, status: u16, body: Option<Value>) {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Internal Server Error",
    };
    let payload = body.map(|b| b.to_string()).unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        payload.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(payload.as_bytes());
}

fn handle(mut stream: TcpStream, state: &Shared) {
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    let unauthorized = json!({ "statusCode": 401, "message": "Unauthorized" });

    match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/api/auth/login") => {
            let state = state.lock().unwrap();
            if req.body["password"] == PASSWORD {
                let body = json!({
                    "accessToken": state.access_token(),
                    "refreshToken": state.refresh_token(),
                    "user": { "id": "u1", "email": req.body["email"], "organizationId": "org-1" }
                });
                respond(&mut stream, 200, Some(body));
            } else {
                respond(
                    &mut stream,
                    401,
                    Some(json!({ "statusCode": 401, "message": "Invalid credentials" })),
                );
            }
        }
        ("POST", "/api/auth/refresh") => {
            let delay = state.lock().unwrap().refresh_delay;
            if let Some(delay) = delay {
                thread::sleep(delay);
            }
            let mut state = state.lock().unwrap();
            state.refresh_calls += 1;
            let presented = req.body["refreshToken"].as_str().unwrap_or_default();
            // Any refresh token of an earlier generation is still honoured once.
            if presented.starts_with("refresh-") && presented != "refresh-revoked" {
                state.generation += 1;
                let body = json!({
                    "accessToken": state.access_token(),
                    "refreshToken": state.refresh_token(),
                });
                respond(&mut stream, 200, Some(body));
            } else {
                respond(&mut stream, 401, Some(unauthorized));
            }
        }
        (method, path) if path.starts_with("/api/inventory/items") => {
            let expected = format!("Bearer {}", state.lock().unwrap().access_token());
            if req.authorization.as_deref() != Some(expected.as_str()) {
                respond(&mut stream, 401, Some(unauthorized));
                return;
            }
            items(&mut stream, state, method, path, req.body);
        }
        _ => respond(&mut stream, 404, Some(json!({ "message": "Not Found" }))),
    }
}

fn items(stream: &mut TcpStream, state: &Shared, method: &str, path: &str, body: Value) {
    let id = path.strip_prefix("/api/inventory/items/").map(str::to_string);
    match (method, id) {
        ("GET", None) => {
            let items = state.lock().unwrap().items.clone();
            let total = items.len();
            respond(stream, 200, Some(json!({ "data": items, "meta": { "total": total } })));
        }
        ("GET", Some(id)) => {
            let found = state
                .lock()
                .unwrap()
                .items
                .iter()
                .find(|i| i["id"] == id.as_str())
                .cloned();
            match found {
                Some(item) => respond(stream, 200, Some(item)),
                None => respond(stream, 404, Some(json!({ "message": "Item not found" }))),
            }
        }
        ("POST", None) => {
            let delay = {
                let mut s = state.lock().unwrap();
                s.item_posts += 1;
                s.write_delay
            };
            if let Some(delay) = delay {
                thread::sleep(delay);
            }
            let sku = body["sku"].as_str().unwrap_or_default().to_string();
            if sku == "BOOM" {
                respond(stream, 500, Some(json!({ "message": "database unavailable" })));
                return;
            }
            let mut s = state.lock().unwrap();
            if s.items.iter().any(|i| i["sku"] == sku.as_str()) {
                let errors = json!({
                    "statusCode": 400,
                    "errors": [{ "field": "sku", "message": "SKU already exists" }]
                });
                drop(s);
                respond(stream, 400, Some(errors));
                return;
            }
            let mut item = body;
            item["id"] = json!(format!("item-{}", s.items.len() + 1));
            item["quantityOnHand"] = json!(0);
            s.items.push(item.clone());
            drop(s);
            respond(stream, 201, Some(item));
        }
        ("DELETE", Some(id)) => {
            state.lock().unwrap().items.retain(|i| i["id"] != id.as_str());
            respond(stream, 204, None);
        }
        _ => respond(stream, 404, Some(json!({ "message": "Not Found" }))),
    }
}
