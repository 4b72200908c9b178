use std::sync::RwLock;

use shared_models::Role;

/// The credential every authorized call reads. It is written exactly once at
/// login and cleared exactly once at logout; nothing mutates it mid-session.
/// An explicit store injected into the `ApiClient` at construction, not an
/// ambient global.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
}

#[derive(Debug, Clone)]
struct Session {
    role: Role,
    token: String,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the bearer token issued at login.
    pub fn open(&self, role: Role, token: String) {
        *self.write_guard() = Some(Session { role, token });
    }

    /// Drop the credential at logout or on detected expiry.
    pub fn close(&self) {
        *self.write_guard() = None;
    }

    pub fn token(&self) -> Option<String> {
        self.read_guard().as_ref().map(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.read_guard().as_ref().map(|s| s.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_guard().is_some()
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_lifecycle() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);

        store.open(Role::Patient, "tok-123".to_string());
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert_eq!(store.role(), Some(Role::Patient));

        store.close();
        assert!(!store.is_authenticated());
        assert_eq!(store.role(), None);
    }
}
