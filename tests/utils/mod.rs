// Test utilities: an in-process fake of the Gradle Enterprise REST API
//
// Serves /api/builds, maven-attributes and maven-build-cache-performance from
// fixed data on a local tiny_http server, and records every request.

#![allow(dead_code)] // Not every test binary uses every helper

use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tiny_http::{Response, Server, StatusCode};

pub const ACCESS_KEY: &str = "test-access-key";

/// A request as seen by the fake server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

/// Build data served by the fake
#[derive(Debug, Clone, Default)]
pub struct FakeEnterprise {
    builds: Vec<Value>,
    attributes: HashMap<String, Value>,
    performance: HashMap<String, Value>,
    /// Request path -> (status, body)
    errors: HashMap<String, (u16, String)>,
}

impl FakeEnterprise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maven build of project "core" requesting clean+install, with one
    /// non-cacheable compile goal and one cache hit
    pub fn maven_build(mut self, id: &str, compile_ms: u64) -> Self {
        self.builds.push(json!({
            "id": id,
            "availableAt": 1_650_000_000_000u64 + self.builds.len() as u64,
            "buildToolType": "maven",
            "buildToolVersion": "3.8.6",
            "buildAgentVersion": "1.15"
        }));
        self.attributes.insert(
            id.to_string(),
            json!({
                "id": id,
                "topLevelProjectName": "core",
                "requestedGoals": ["clean", "install"]
            }),
        );
        self.performance.insert(
            id.to_string(),
            json!({
                "id": id,
                "goalExecution": [
                    {
                        "goalName": "compile",
                        "goalExecutionId": "default-compile",
                        "goalProjectName": "core",
                        "mojoType": "org.apache.maven.plugin.compiler.CompilerMojo",
                        "duration": compile_ms,
                        "avoidanceOutcome": "executed_not_cacheable"
                    },
                    {
                        "goalName": "jar",
                        "goalExecutionId": "default-jar",
                        "goalProjectName": "core",
                        "duration": 5,
                        "avoidanceOutcome": "avoided_from_remote_cache"
                    }
                ]
            }),
        );
        self
    }

    pub fn gradle_build(mut self, id: &str) -> Self {
        self.builds.push(json!({
            "id": id,
            "availableAt": 1_650_000_000_000u64 + self.builds.len() as u64,
            "buildToolType": "gradle",
            "buildToolVersion": "7.4"
        }));
        self
    }

    /// Make the attributes call of `id` fail with a build-deleted problem
    pub fn deleted(mut self, id: &str) -> Self {
        self.builds.push(json!({
            "id": id,
            "availableAt": 0,
            "buildToolType": "maven"
        }));
        self.errors.insert(
            format!("/api/builds/{}/maven-attributes", id),
            (
                404,
                json!({
                    "type": "urn:gradle:enterprise:api:problems:build-deleted",
                    "title": "Build deleted",
                    "status": 404,
                    "detail": format!("Build '{}' was deleted.", id)
                })
                .to_string(),
            ),
        );
        self
    }

    /// Fail any request to `path` with a raw status and body
    pub fn fail(mut self, path: &str, code: u16, body: &str) -> Self {
        self.errors.insert(path.to_string(), (code, body.to_string()));
        self
    }

    fn respond(&self, request: &RecordedRequest) -> (u16, String) {
        let expected = format!("Bearer {}", ACCESS_KEY);
        if request.authorization.as_deref() != Some(expected.as_str()) {
            return (
                401,
                json!({"type": "urn:gradle:enterprise:api:problems:unauthorized", "detail": "bad key"})
                    .to_string(),
            );
        }

        if let Some((code, body)) = self.errors.get(&request.path) {
            return (*code, body.clone());
        }

        if request.path == "/api/builds" {
            return (200, self.list(request).to_string());
        }

        let parts: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
        let found = match parts.as_slice() {
            ["api", "builds", id, "maven-attributes"] => self.attributes.get(*id),
            ["api", "builds", id, "maven-build-cache-performance"] => self.performance.get(*id),
            _ => None,
        };
        match found {
            Some(body) => (200, body.to_string()),
            None => (404, json!({"type": "urn:test:not-found", "detail": request.path}).to_string()),
        }
    }

    fn list(&self, request: &RecordedRequest) -> Value {
        let since = request.query.get("sinceBuild").map(String::as_str).unwrap_or("");
        let max = request
            .query
            .get("maxBuilds")
            .and_then(|m| m.parse::<usize>().ok())
            .unwrap_or(100);
        let start = self
            .builds
            .iter()
            .position(|b| b["id"] == since)
            .map_or(0, |i| i + 1);
        Value::Array(self.builds.iter().skip(start).take(max).cloned().collect())
    }
}

/// Local HTTP server answering with a `FakeEnterprise`
pub struct MockServer {
    pub url: String,
    server: Arc<Server>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    pub fn start(fake: FakeEnterprise) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind mock server"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("mock server listens on IP")
            .port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    let recorded = record(&request);
                    let (code, body) = fake.respond(&recorded);
                    requests.lock().unwrap().push(recorded);
                    let _ = request.respond(
                        Response::from_string(body).with_status_code(StatusCode(code)),
                    );
                }
            })
        };

        Self {
            url: format!("http://127.0.0.1:{}", port),
            server,
            requests,
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Paths requested so far, in order
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// One-shot server answering with `status_line` and a body that ends before
/// its announced Content-Length
///
/// Returns the base URL and the serving thread.
pub fn truncated_body_server(status_line: &'static str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind truncating server");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));

    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let response = format!(
            "{}\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{{\"type\"",
            status_line
        );
        let _ = stream.write_all(response.as_bytes());
        // Dropping the stream closes the connection mid-body
    });

    (url, handle)
}

fn record(request: &tiny_http::Request) -> RecordedRequest {
    let (path, query) = match request.url().split_once('?') {
        Some((path, query)) => (path.to_string(), parse_query(query)),
        None => (request.url().to_string(), HashMap::new()),
    };
    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.as_str().to_string());

    RecordedRequest {
        path,
        query,
        authorization,
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
