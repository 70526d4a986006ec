//! Per-request session state.

use std::collections::HashMap;

use uuid::Uuid;

const USER_KEY: &str = "user";
const CSRF_KEY: &str = "csrf_token";

/// Data persisted between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub values: HashMap<String, String>,
    pub flash: HashMap<String, String>,
    pub old_input: HashMap<String, String>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.flash.is_empty() && self.old_input.is_empty()
    }
}

/// The session attached to a single request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: Option<String>,
    data: SessionData,
    regenerate: bool,
    destroyed: bool,
}

impl Session {
    /// An empty session with no id yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn restore(id: String, data: SessionData) -> Self {
        Self {
            id: Some(id),
            data,
            regenerate: false,
            destroyed: false,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.values.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.data.values.remove(key)
    }

    /// Store a message readable exactly once.
    pub fn flash(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.data.flash.insert(key.into(), message.into());
    }

    /// Read and clear a flash message.
    pub fn take_flash(&mut self, key: &str) -> Option<String> {
        self.data.flash.remove(key)
    }

    /// Remember form input so a redisplayed form can be repopulated.
    pub fn set_old_input<K, V>(&mut self, input: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.data.old_input = input
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// Read and clear one remembered input value.
    pub fn take_old_input(&mut self, key: &str) -> String {
        self.data.old_input.remove(key).unwrap_or_default()
    }

    pub fn clear_old_input(&mut self) {
        self.data.old_input.clear();
    }

    pub fn user(&self) -> Option<&str> {
        self.get(USER_KEY).filter(|u| !u.is_empty())
    }

    pub fn set_user(&mut self, email: impl Into<String>) {
        self.set(USER_KEY, email);
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Issue a fresh id on save, dropping the old one (fixation protection).
    pub fn regenerate(&mut self) {
        self.regenerate = true;
    }

    pub(crate) fn needs_regeneration(&self) -> bool {
        self.regenerate
    }

    /// Drop all data; the store forgets the session on save.
    pub fn destroy(&mut self) {
        self.data = SessionData::default();
        self.destroyed = true;
    }

    /// Start over after [`destroy`](Session::destroy) within the same request.
    ///
    /// Used to carry a flash message past a logout.
    pub fn restart(&mut self) {
        self.destroyed = false;
        self.regenerate = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// CSRF token for this session, created on first use.
    pub fn csrf_token(&mut self) -> String {
        if let Some(token) = self.get(CSRF_KEY) {
            return token.to_string();
        }
        let token = Uuid::new_v4().simple().to_string();
        self.set(CSRF_KEY, token.clone());
        token
    }

    /// Compare a submitted token against the session's.
    pub fn verify_csrf(&self, submitted: Option<&str>) -> bool {
        match (self.get(CSRF_KEY), submitted) {
            (Some(expected), Some(given)) => !expected.is_empty() && expected == given,
            _ => false,
        }
    }
}
