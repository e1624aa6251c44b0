//! Identity collaborator
//!
//! Sign-in flows live outside this repository; the engine only needs to
//! know who, if anyone, is currently signed in, and to observe sign-in
//! state changes.

use tokio::sync::watch;

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
}

/// Abstract identity provider
pub trait Identity: Send + Sync {
    /// The currently signed-in user, if any
    fn current_user(&self) -> Option<AuthUser>;

    /// Subscribe to sign-in state changes
    fn watch(&self) -> watch::Receiver<Option<AuthUser>>;
}

/// Fixed identity for local development and tests
pub struct StaticIdentity {
    sender: watch::Sender<Option<AuthUser>>,
}

impl StaticIdentity {
    pub fn signed_in(uid: &str) -> Self {
        let (sender, _) = watch::channel(Some(AuthUser {
            uid: uid.to_string(),
        }));
        Self { sender }
    }

    pub fn signed_out() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Flip the sign-in state, notifying watchers
    pub fn set(&self, user: Option<AuthUser>) {
        let _ = self.sender.send(user);
    }
}

impl Identity for StaticIdentity {
    fn current_user(&self) -> Option<AuthUser> {
        self.sender.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Option<AuthUser>> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_identity_reports_current_user() {
        let identity = StaticIdentity::signed_in("u-1");
        assert_eq!(identity.current_user().unwrap().uid, "u-1");

        identity.set(None);
        assert!(identity.current_user().is_none());
    }

    #[tokio::test]
    async fn watchers_observe_sign_in_changes() {
        let identity = StaticIdentity::signed_out();
        let mut rx = identity.watch();

        identity.set(Some(AuthUser {
            uid: "u-2".to_string(),
        }));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().uid, "u-2");
    }
}
