//! End-to-end tests: the real server on an ephemeral port, backed by the
//! in-memory store, spoken to over plain HTTP/1.1.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{Value, json};
use student_directory::{app, serve_with_shutdown, store::MemoryStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), student_directory::Error>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, rx) = oneshot::channel::<()>();
        let router = app::router(MemoryStore::new());
        let handle = tokio::spawn(serve_with_shutdown(listener, router, async {
            let _ = rx.await;
        }));
        Self { addr, shutdown, handle }
    }

    async fn send(&self, method: &str, path: &str, body: Option<Value>) -> (u16, String) {
        let body = body.map(|b| b.to_string()).unwrap_or_default();
        let request = format!(
            "{method} {path} HTTP/1.1\r\n\
             host: localhost\r\n\
             connection: close\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\r\n{body}",
            body.len()
        );

        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();

        let text = String::from_utf8(raw).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        let status = head.split(' ').nth(1).unwrap().parse().unwrap();
        (status, body.to_owned())
    }

    async fn send_json(&self, method: &str, path: &str, body: Option<Value>) -> (u16, Value) {
        let (status, body) = self.send(method, path, body).await;
        let value = if body.is_empty() { Value::Null } else { serde_json::from_str(&body).unwrap() };
        (status, value)
    }

    async fn stop(self) {
        self.shutdown.send(()).unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn student_lifecycle() {
    let server = TestServer::start().await;
    let ana = json!({ "name": "Ana", "age": 20, "address": { "city": "Lima", "country": "Peru" } });

    let (status, created) = server.send_json("POST", "/students", Some(ana.clone())).await;
    assert_eq!(status, 201);
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(id.len(), 24);

    let (status, fetched) = server.send_json("GET", &format!("/students/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, ana);

    let (status, body) = server.send("PATCH", &format!("/students/{id}"), Some(json!({ "age": 21 }))).await;
    assert_eq!(status, 204);
    assert!(body.is_empty());

    let (_, fetched) = server.send_json("GET", &format!("/students/{id}"), None).await;
    assert_eq!(fetched["age"], 21);
    assert_eq!(fetched["name"], "Ana");
    assert_eq!(fetched["address"], ana["address"]);

    let (status, deleted) = server.send_json("DELETE", &format!("/students/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(deleted, json!({ "message": "Student deleted successfully" }));

    let (status, missing) = server.send_json("GET", &format!("/students/{id}"), None).await;
    assert_eq!(status, 404);
    assert_eq!(missing, json!({ "detail": "Student not found" }));

    server.stop().await;
}

#[tokio::test]
async fn list_filters_over_http() {
    let server = TestServer::start().await;
    for (name, age, country) in [("a", 25, "US"), ("b", 30, "US"), ("c", 40, "Peru")] {
        let student = json!({ "name": name, "age": age, "address": { "city": "x", "country": country } });
        let (status, _) = server.send("POST", "/students", Some(student)).await;
        assert_eq!(status, 201);
    }

    let (status, body) = server.send_json("GET", "/students?age=30", None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "data": [{ "name": "b", "age": 30 }, { "name": "c", "age": 40 }] }));

    let (_, body) = server.send_json("GET", "/students?age=30&country=US", None).await;
    assert_eq!(body, json!({ "data": [{ "name": "b", "age": 30 }] }));

    let (_, body) = server.send_json("GET", "/students", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    server.stop().await;
}

#[tokio::test]
async fn error_contract() {
    let server = TestServer::start().await;

    let (status, body) = server.send_json("GET", "/students/not-an-id", None).await;
    assert_eq!((status, body), (400, json!({ "detail": "Invalid ID format" })));

    let (status, body) = server.send_json("PATCH", "/students/507f1f77bcf86cd799439011", Some(json!({}))).await;
    assert_eq!((status, body), (400, json!({ "detail": "No fields to update" })));

    let (status, body) = server.send_json("DELETE", "/students/507f1f77bcf86cd799439011", None).await;
    assert_eq!((status, body), (404, json!({ "detail": "Student not found" })));

    let (status, _) = server.send("POST", "/students", Some(json!({ "name": "no age" }))).await;
    assert_eq!(status, 422);

    let (status, body) = server.send_json("GET", "/teachers", None).await;
    assert_eq!((status, body), (404, json!({ "detail": "Not Found" })));

    let (status, body) = server.send_json("PUT", "/students/507f1f77bcf86cd799439011", Some(json!({}))).await;
    assert_eq!((status, body), (405, json!({ "detail": "Method Not Allowed" })));

    server.stop().await;
}

#[tokio::test]
async fn health_probes() {
    let server = TestServer::start().await;
    assert_eq!(server.send("GET", "/healthz", None).await, (200, "ok".to_owned()));
    assert_eq!(server.send("GET", "/readyz", None).await, (200, "ready".to_owned()));
    server.stop().await;
}

#[tokio::test]
async fn create_coerces_string_age() {
    let server = TestServer::start().await;
    let body = json!({ "name": "Ana", "age": "20", "address": { "city": "Lima", "country": "Peru" } });

    let (status, created) = server.send_json("POST", "/students", Some(body)).await;
    assert_eq!(status, 201);
    let id = created["id"].as_str().unwrap().to_owned();

    let (_, fetched) = server.send_json("GET", &format!("/students/{id}"), None).await;
    assert_eq!(fetched["age"], 20);

    let (status, _) = server.send("PATCH", &format!("/students/{id}"), Some(json!({ "age": 21.0 }))).await;
    assert_eq!(status, 204);
    let (_, fetched) = server.send_json("GET", &format!("/students/{id}"), None).await;
    assert_eq!(fetched["age"], 21);

    let (status, _) = server.send("POST", "/students", Some(json!({ "name": "Bo", "age": 20.5, "address": { "city": "x", "country": "y" } }))).await;
    assert_eq!(status, 422);

    server.stop().await;
}

#[tokio::test]
async fn shutdown_closes_idle_keep_alive_connections() {
    let server = TestServer::start().await;

    // One request without `connection: close`, then leave the socket open.
    let mut idle = TcpStream::connect(server.addr).await.unwrap();
    idle.write_all(b"GET /healthz HTTP/1.1\r\nhost: localhost\r\n\r\n").await.unwrap();
    let mut raw = Vec::new();
    let mut buf = [0u8; 512];
    while !raw.ends_with(b"\r\n\r\nok") {
        let n = idle.read(&mut buf).await.unwrap();
        assert_ne!(n, 0, "server closed a keep-alive connection early");
        raw.extend_from_slice(&buf[..n]);
    }

    let TestServer { shutdown, handle, .. } = server;
    shutdown.send(()).unwrap();
    let stopped = tokio::time::timeout(Duration::from_secs(5), handle).await;
    assert!(matches!(stopped, Ok(Ok(Ok(())))), "server did not stop with an idle connection open");

    // The server hung up on the idle socket.
    let n = idle.read(&mut buf).await.unwrap_or(0);
    assert_eq!(n, 0);
}
