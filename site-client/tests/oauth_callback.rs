// site-client/tests/oauth_callback.rs
mod support;

use actix_web::{web, HttpRequest, HttpResponse};
use common::models::Role;
use serde_json::json;
use site_client::oauth::CallbackStage;
use site_client::{Authenticator, CommitPolicy, Navigation, SessionStore};
use support::{account_json, mint_token, StubBackend};

const SESSION_COOKIE: &str = "sessionid";

fn has_session_cookie(req: &HttpRequest) -> bool {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value() == "google-session")
        .unwrap_or(false)
}

fn jwt_exchange(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/auth/google/jwt/",
        web::get().to(|req: HttpRequest| async move {
            if has_session_cookie(&req) {
                HttpResponse::Ok().json(json!({
                    "refresh": mint_token("refresh", 8),
                    "access": mint_token("access", 8)
                }))
            } else {
                HttpResponse::Unauthorized()
                    .json(json!({"detail": "Authentication credentials were not provided."}))
            }
        }),
    );
}

fn staff_backend(cfg: &mut web::ServiceConfig) {
    jwt_exchange(cfg);
    cfg.route(
        "/api/user/",
        web::get().to(|| async { HttpResponse::Ok().json(account_json(8, "lead", true, false)) }),
    );
}

fn member_backend(cfg: &mut web::ServiceConfig) {
    jwt_exchange(cfg);
    cfg.route(
        "/api/user/",
        web::get().to(|| async { HttpResponse::Ok().json(account_json(9, "student", false, false)) }),
    );
}

fn broken_user_backend(cfg: &mut web::ServiceConfig) {
    jwt_exchange(cfg);
    cfg.route(
        "/api/user/",
        web::get().to(|| async { HttpResponse::InternalServerError().body("boom") }),
    );
}

fn seeded_store() -> SessionStore {
    let store = SessionStore::in_memory();
    store.storage().set("access", "previous-access").unwrap();
    store.storage().set("refresh", "previous-refresh").unwrap();
    store.storage().set("siteContent", "{}").unwrap();
    store
}

#[actix_web::test]
async fn failed_exchange_redirects_and_writes_no_token() {
    let backend = StubBackend::start(staff_backend);
    let store = SessionStore::in_memory();
    let (auth, session) = Authenticator::restore(backend.client(store.clone()));

    // No session cookie: the backend refuses the exchange
    let nav = auth.google_callback().run().await;

    assert_eq!(nav, Navigation::LoginError);
    assert_eq!(nav.route(), "/login?error=google");
    assert!(store.storage().keys().is_empty());
    assert!(!session.is_authenticated());
    assert!(backend.log.to_path("/api/user/").is_empty());
}

#[actix_web::test]
async fn staff_account_becomes_admin() {
    let backend = StubBackend::start(staff_backend);
    let store = SessionStore::in_memory();
    let (auth, session) = Authenticator::restore(backend.client(store.clone()));
    auth.client().with_session_cookie(SESSION_COOKIE, "google-session").unwrap();

    let nav = auth.google_callback().run().await;

    assert_eq!(nav, Navigation::Dashboard);
    assert_eq!(nav.route(), "/dashboard");

    let persisted = store.load_user().expect("user persisted");
    assert_eq!(persisted.role, Role::Admin);
    assert_eq!(persisted.id, "8");
    assert_eq!(persisted.name, "lead");
    assert_eq!(session.current(), Some(persisted));

    let tokens = store.load_tokens().expect("pair persisted");
    let exchange = &backend.log.to_path("/auth/google/jwt/")[0];
    assert!(exchange.cookie.as_deref().unwrap().contains("sessionid=google-session"));
    assert_eq!(exchange.authorization, None);
    let lookup = &backend.log.to_path("/api/user/")[0];
    assert_eq!(lookup.authorization, Some(format!("Bearer {}", tokens.access)));
}

#[actix_web::test]
async fn plain_account_becomes_member() {
    let backend = StubBackend::start(member_backend);
    let store = SessionStore::in_memory();
    let (auth, session) = Authenticator::restore(backend.client(store.clone()));
    auth.client().with_session_cookie(SESSION_COOKIE, "google-session").unwrap();

    assert_eq!(auth.google_callback().run().await, Navigation::Dashboard);

    assert_eq!(store.load_user().unwrap().role, Role::Member);
    let raw: serde_json::Value =
        serde_json::from_str(&store.storage().get("user").unwrap()).unwrap();
    assert_eq!(raw["role"], "member");
    assert!(!session.is_admin());
}

#[actix_web::test]
async fn success_replaces_whole_namespace() {
    let backend = StubBackend::start(member_backend);
    let store = seeded_store();
    let (auth, _session) = Authenticator::restore(backend.client(store.clone()));
    auth.client().with_session_cookie(SESSION_COOKIE, "google-session").unwrap();

    assert_eq!(auth.google_callback().run().await, Navigation::Dashboard);

    assert_eq!(store.storage().keys(), vec!["access", "refresh", "user"]);
    assert_ne!(store.access_token().as_deref(), Some("previous-access"));
}

#[actix_web::test]
async fn eager_commit_loses_previous_session_when_user_fetch_fails() {
    let backend = StubBackend::start(broken_user_backend);
    let store = seeded_store();
    let (auth, session) = Authenticator::restore(backend.client(store.clone()));
    auth.client().with_session_cookie(SESSION_COOKIE, "google-session").unwrap();

    let failure = auth.google_callback().execute().await.unwrap_err();
    assert_eq!(failure.stage, CallbackStage::FetchUser);
    assert_eq!(failure.source.status().map(|s| s.as_u16()), Some(500));

    // The storage wipe already happened; the new pair is in place, no user
    assert!(store.storage().get("siteContent").is_none());
    assert_ne!(store.access_token().as_deref(), Some("previous-access"));
    assert!(store.load_user().is_none());
    assert!(!session.is_authenticated());
}

#[actix_web::test]
async fn deferred_commit_keeps_previous_session_when_user_fetch_fails() {
    let backend = StubBackend::start(broken_user_backend);
    let store = seeded_store();
    let (auth, _session) = Authenticator::restore(backend.client(store.clone()));
    auth.client().with_session_cookie(SESSION_COOKIE, "google-session").unwrap();

    let nav = auth.google_callback_with(CommitPolicy::Deferred).run().await;

    assert_eq!(nav, Navigation::LoginError);
    assert_eq!(store.access_token().as_deref(), Some("previous-access"));
    assert_eq!(store.refresh_token().as_deref(), Some("previous-refresh"));
    assert!(store.storage().get("siteContent").is_some());
}

#[actix_web::test]
async fn deferred_commit_succeeds_like_eager() {
    let backend = StubBackend::start(staff_backend);
    let store = seeded_store();
    let (auth, session) = Authenticator::restore(backend.client(store.clone()));
    auth.client().with_session_cookie(SESSION_COOKIE, "google-session").unwrap();

    let nav = auth.google_callback_with(CommitPolicy::Deferred).run().await;

    assert_eq!(nav, Navigation::Dashboard);
    assert!(session.is_admin());
    assert_eq!(store.storage().keys(), vec!["access", "refresh", "user"]);
}
