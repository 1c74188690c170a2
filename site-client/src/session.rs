// site-client/src/session.rs
// One writer, many readers. Nothing here persists.

use crate::session_store::SessionStore;
use common::models::SessionUser;
use tokio::sync::watch;

/// Read side, cheap to clone
#[derive(Clone, Debug)]
pub struct SessionContext {
    rx: watch::Receiver<Option<SessionUser>>,
}

/// Sole write side
#[derive(Debug)]
pub struct SessionWriter {
    tx: watch::Sender<Option<SessionUser>>,
}

impl SessionContext {
    /// An empty context and its writer
    pub fn new() -> (SessionWriter, SessionContext) {
        Self::with_user(None)
    }

    pub fn with_user(user: Option<SessionUser>) -> (SessionWriter, SessionContext) {
        let (tx, rx) = watch::channel(user);
        (SessionWriter { tx }, SessionContext { rx })
    }

    /// Hydrate from the persisted user mirror
    pub fn restore(store: &SessionStore) -> (SessionWriter, SessionContext) {
        let user = store.load_user();
        if let Some(user) = &user {
            tracing::debug!("Restored session for user {}", user.id);
        }
        Self::with_user(user)
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.rx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.rx.borrow().as_ref().map_or(false, SessionUser::is_admin)
    }

    /// A fresh receiver for observers that want change notifications
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.rx.clone()
    }
}

impl SessionWriter {
    /// Replace the current user. Never fails, even with no readers left.
    pub fn set_user(&self, user: Option<SessionUser>) {
        match &user {
            Some(u) => tracing::info!("Session user set to {} ({:?})", u.id, u.role),
            None => tracing::info!("Session user cleared"),
        }
        self.tx.send_replace(user);
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.tx.borrow().clone()
    }

    pub fn context(&self) -> SessionContext {
        SessionContext { rx: self.tx.subscribe() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::models::{Role, UserStatus};

    fn user(role: Role) -> SessionUser {
        SessionUser {
            id: "9".into(),
            email: "x@lab.example".into(),
            name: "x".into(),
            role,
            status: UserStatus::Active,
            last_login: None,
            created_at: Utc::now(),
            verified: true,
        }
    }

    #[test]
    fn test_writer_updates_every_reader() {
        let (writer, ctx) = SessionContext::new();
        let other = ctx.clone();
        assert!(!ctx.is_authenticated());

        writer.set_user(Some(user(Role::Admin)));
        assert!(ctx.is_admin());
        assert_eq!(other.current().unwrap().id, "9");

        writer.set_user(None);
        assert!(!other.is_authenticated());
        assert!(!other.is_admin());
    }

    #[test]
    fn test_set_user_without_readers() {
        let (writer, ctx) = SessionContext::new();
        drop(ctx);
        writer.set_user(Some(user(Role::Member)));
        assert_eq!(writer.current().unwrap().role, Role::Member);
        assert!(writer.context().is_authenticated());
    }

    #[test]
    fn test_restore_from_store() {
        let store = SessionStore::in_memory();
        store.save_user(&user(Role::Member)).unwrap();

        let (_writer, ctx) = SessionContext::restore(&store);
        assert!(ctx.is_authenticated());
        assert!(!ctx.is_admin());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let (writer, ctx) = SessionContext::new();
        let mut rx = ctx.subscribe();

        writer.set_user(Some(user(Role::Admin)));
        rx.changed().await.unwrap();
        assert!(rx.borrow().as_ref().unwrap().is_admin());
    }
}
