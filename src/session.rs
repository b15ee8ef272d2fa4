//! Authentication session: in-memory state plus the durable copy in browser
//! storage, kept consistent by routing every change through one place.

use std::rc::Rc;

use log::info;
use yew::prelude::*;

pub const TOKEN_KEY: &str = "auth_token";
pub const USERNAME_KEY: &str = "username";

pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<S: StorageBackend> StorageBackend for &S {
    fn get(&self, key: &str) -> Option<String> {
        S::get(self, key)
    }
    fn set(&self, key: &str, value: &str) {
        S::set(self, key, value)
    }
    fn remove(&self, key: &str) {
        S::remove(self, key)
    }
}

/// `window.localStorage`; a missing storage object degrades to an empty,
/// non-persisting session.
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl StorageBackend for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Authenticated iff `token` is present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub struct SessionStore<S> {
    storage: S,
}

impl<S: StorageBackend> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Restore whatever the last visit left behind.
    pub fn load(&self) -> Session {
        Session {
            token: self.storage.get(TOKEN_KEY),
            username: self.storage.get(USERNAME_KEY),
        }
    }

    pub fn persist_login(&self, token: &str, username: &str) {
        self.storage.set(TOKEN_KEY, token);
        self.storage.set(USERNAME_KEY, username);
    }

    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USERNAME_KEY);
    }

    /// 401 handling drops the token only. The stale username stays in
    /// storage until the next login; callers must not rely on it implying
    /// an authenticated session.
    pub fn evict_token(&self) {
        self.storage.remove(TOKEN_KEY);
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }
}

pub fn browser() -> SessionStore<BrowserStorage> {
    SessionStore::new(BrowserStorage)
}

pub enum SessionAction {
    LoggedIn { token: String, username: String },
    LoggedOut,
    /// The request layer already dropped the durable token after a 401;
    /// this mirrors the eviction into in-memory state.
    TokenEvicted,
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: SessionAction) -> Rc<Self> {
        let store = browser();
        match action {
            SessionAction::LoggedIn { token, username } => {
                store.persist_login(&token, &username);
                info!("session started for {username}");
                Rc::new(Session {
                    token: Some(token),
                    username: Some(username),
                })
            }
            SessionAction::LoggedOut => {
                store.clear();
                info!("session cleared");
                Rc::new(Session::default())
            }
            SessionAction::TokenEvicted => {
                store.evict_token();
                Rc::new(Session {
                    token: None,
                    username: self.username.clone(),
                })
            }
        }
    }
}

pub type SessionHandle = UseReducerHandle<Session>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage(RefCell<HashMap<String, String>>);

    impl StorageBackend for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }
        fn set(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_owned(), value.to_owned());
        }
        fn remove(&self, key: &str) {
            self.0.borrow_mut().remove(key);
        }
    }

    #[test]
    fn empty_storage_loads_anonymous_session() {
        let mem = MemoryStorage::default();
        let store = SessionStore::new(&mem);
        let session = store.load();
        assert!(!session.is_authenticated());
        assert_eq!(session.username, None);
    }

    #[test]
    fn login_round_trips_through_storage() {
        let mem = MemoryStorage::default();
        let store = SessionStore::new(&mem);
        store.persist_login("tok-123", "ada");
        let session = store.load();
        assert!(session.is_authenticated());
        assert_eq!(session.token.as_deref(), Some("tok-123"));
        assert_eq!(session.username.as_deref(), Some("ada"));
    }

    #[test]
    fn logout_clears_both_keys() {
        let mem = MemoryStorage::default();
        let store = SessionStore::new(&mem);
        store.persist_login("tok-123", "ada");
        store.clear();
        let session = store.load();
        assert_eq!(session.token, None);
        assert_eq!(session.username, None);
    }

    #[test]
    fn token_eviction_leaves_username_behind() {
        let mem = MemoryStorage::default();
        let store = SessionStore::new(&mem);
        store.persist_login("tok-123", "ada");
        store.evict_token();
        let session = store.load();
        assert!(!session.is_authenticated());
        // intentional: only the token is dropped on 401
        assert_eq!(session.username.as_deref(), Some("ada"));
    }
}
