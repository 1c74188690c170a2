// site-client/tests/support/mod.rs
// In-process stand-in for the Django backend
#![allow(dead_code)]

use actix_web::dev::Service;
use actix_web::{web, App, HttpServer};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};
use site_client::{ApiClient, SessionStore};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

const STUB_SECRET: &[u8] = b"stub-backend-secret";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub cookie: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    fn push(&self, request: RecordedRequest) {
        self.0.lock().unwrap().push(request);
    }

    pub fn all(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn to_path(&self, path: &str) -> Vec<RecordedRequest> {
        self.all().into_iter().filter(|r| r.path == path).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

pub struct StubBackend {
    pub base_url: String,
    pub log: RequestLog,
}

impl StubBackend {
    /// Bind on an ephemeral port and serve `routes` until the test ends
    pub fn start<F>(routes: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
    {
        let log = RequestLog::default();
        let recorder = log.clone();

        let server = HttpServer::new(move || {
            let recorder = recorder.clone();
            App::new()
                .wrap_fn(move |req, srv| {
                    let header = |name: &str| {
                        req.headers()
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    recorder.push(RecordedRequest {
                        method: req.method().to_string(),
                        path: req.path().to_string(),
                        authorization: header("authorization"),
                        cookie: header("cookie"),
                        content_type: header("content-type"),
                    });
                    srv.call(req)
                })
                .configure(routes.clone())
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub backend");

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            base_url: format!("http://{}", addr),
            log,
        }
    }

    pub fn client(&self, store: SessionStore) -> ApiClient {
        ApiClient::new(&self.base_url, store).expect("client for stub backend")
    }
}

/// Base URL nothing listens on
pub fn dead_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[derive(Serialize)]
struct Claims<'a> {
    token_type: &'a str,
    user_id: u64,
    exp: u64,
    iat: u64,
}

/// A simplejwt-shaped token, as the backend would issue
pub fn mint_token(token_type: &str, user_id: u64) -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    let ttl = if token_type == "access" { 300 } else { 86400 };
    encode(
        &Header::default(),
        &Claims { token_type, user_id, iat: now, exp: now + ttl },
        &EncodingKey::from_secret(STUB_SECRET),
    )
    .expect("mint stub token")
}

pub fn account_json(id: u64, username: &str, is_staff: bool, is_superuser: bool) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@lab.example", username),
        "first_name": "",
        "last_name": "",
        "is_staff": is_staff,
        "is_superuser": is_superuser,
        "date_joined": "2023-06-01T00:00:00Z",
        "profile": {"phone": null, "bio": null, "profile_image": null, "location": null,
                    "institution": "Lab", "website": null, "linkedin": null,
                    "twitter": null, "github": null},
        "full_name": username
    })
}
