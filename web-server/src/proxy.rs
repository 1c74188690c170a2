// web-server/src/proxy.rs
use actix_web::http::header::{HeaderName as ActixHeaderName, HeaderValue as ActixHeaderValue};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Method;
use serde_json::json;
use thiserror::Error;

/// Largest request body relayed to the backend (profile images, documents)
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

// Connection-scoped headers, never forwarded in either direction
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("backend unreachable: {0}")]
    Unreachable(reqwest::Error),

    #[error("backend response could not be relayed: {0}")]
    Relay(reqwest::Error),

    #[error("unsupported method {0}")]
    Method(String),
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Method(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Backend origin the site-origin prefixes are rewritten onto
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    origin: String,
}

impl Upstream {
    pub fn new(origin: &str) -> reqwest::Result<Self> {
        // Redirects belong to the browser, not to us
        let client = reqwest::Client::builder().redirect(Policy::none()).build()?;
        Ok(Self {
            client,
            origin: common::normalize_base_url(origin),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Mount one forwarding scope per prefix
pub fn configure(cfg: &mut web::ServiceConfig, prefixes: &[String]) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES));
    for prefix in prefixes {
        tracing::info!("Proxying {}/* to backend", prefix);
        cfg.service(web::scope(prefix).default_service(web::route().to(forward)));
    }
}

fn is_forwardable(name: &str) -> bool {
    !HOP_BY_HOP.contains(&name) && name != "host" && name != "content-length"
}

/// Extend an incoming `x-forwarded-for` chain with our peer
fn forwarded_for(prior: Option<&str>, peer: Option<&str>) -> Option<String> {
    let prior = prior.map(str::trim).filter(|p| !p.is_empty());
    match (prior, peer) {
        (Some(prior), Some(peer)) => Some(format!("{}, {}", prior, peer)),
        (Some(prior), None) => Some(prior.to_string()),
        (None, Some(peer)) => Some(peer.to_string()),
        (None, None) => None,
    }
}

async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    upstream: web::Data<Upstream>,
) -> Result<HttpResponse, ProxyError> {
    let method = Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|_| ProxyError::Method(req.method().to_string()))?;
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = format!("{}{}", upstream.origin, path_and_query);

    let mut headers = HeaderMap::new();
    for (name, value) in req.headers().iter() {
        if !is_forwardable(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }
    let info = req.connection_info().clone();
    if let Ok(host) = HeaderValue::from_str(info.host()) {
        headers.insert("x-forwarded-host", host);
    }
    if let Ok(proto) = HeaderValue::from_str(info.scheme()) {
        headers.insert("x-forwarded-proto", proto);
    }
    let prior = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    if let Some(Ok(chain)) = forwarded_for(prior, peer.as_deref()).map(|c| HeaderValue::from_str(&c)) {
        headers.insert("x-forwarded-for", chain);
    }

    tracing::debug!("{} {} -> {}", req.method(), req.path(), target);

    let response = upstream
        .client
        .request(method, &target)
        .headers(headers)
        .body(body.to_vec())
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Backend request to {} failed: {}", target, e);
            ProxyError::Unreachable(e)
        })?;

    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut relayed = HttpResponse::build(status);
    for (name, value) in response.headers().iter() {
        if !is_forwardable(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            ActixHeaderName::from_bytes(name.as_str().as_bytes()),
            ActixHeaderValue::from_bytes(value.as_bytes()),
        ) {
            relayed.append_header((name, value));
        }
    }

    let bytes = response.bytes().await.map_err(ProxyError::Relay)?;
    Ok(relayed.body(bytes))
}
