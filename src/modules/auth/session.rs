use std::sync::{Arc, Mutex};

use log::info;

use super::store::Storage;
use crate::modules::utils::logging::log_auth_event;
use crate::modules::utils::time::Clock;
use crate::{KEY_LAST_ACTIVITY, KEY_RESET_COMPLETED, KEY_USER_ID, SESSION_TIMEOUT_MS};

/// Persisted session state: the authenticated user id, its last-activity
/// timestamp, and the one-shot password-reset completion flag.
///
/// All access serializes through a single mutex, and the store is cheaply
/// cloneable so the idle watchdog can share it with the screens. Invariant: a
/// stored `userId` always has a `lastActivity` written beside it; a session
/// found without one is treated as expired.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<Mutex<Box<dyn Storage>>>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            clock,
        }
    }

    /// Persist a fresh session for `user_id`, stamping activity to now.
    pub fn start_session(&self, user_id: &str) {
        let now = self.clock.now_ms();
        let mut storage = self.storage.lock().unwrap();
        storage.set(KEY_USER_ID, user_id);
        storage.set(KEY_LAST_ACTIVITY, &now.to_string());
        drop(storage);
        log_auth_event("session_start", user_id, true, None);
    }

    /// Refresh the activity timestamp if a session exists; no-op otherwise.
    pub fn touch(&self) {
        let now = self.clock.now_ms();
        let mut storage = self.storage.lock().unwrap();
        if storage.get(KEY_USER_ID).is_some() {
            storage.set(KEY_LAST_ACTIVITY, &now.to_string());
        }
    }

    /// True iff a session exists and has been idle past the timeout. A
    /// missing or unparseable activity timestamp also counts as expired.
    pub fn is_expired(&self) -> bool {
        let storage = self.storage.lock().unwrap();
        if storage.get(KEY_USER_ID).is_none() {
            return false;
        }
        match storage
            .get(KEY_LAST_ACTIVITY)
            .and_then(|raw| raw.parse::<u64>().ok())
        {
            Some(last) => self.clock.now_ms().saturating_sub(last) > SESSION_TIMEOUT_MS,
            None => true,
        }
    }

    /// The authenticated user id, or `None` when there is no session or the
    /// session has expired.
    pub fn valid_user(&self) -> Option<String> {
        if self.is_expired() {
            return None;
        }
        self.storage.lock().unwrap().get(KEY_USER_ID)
    }

    /// Drop the session and the completion flag.
    pub fn end_session(&self) {
        let mut storage = self.storage.lock().unwrap();
        let user = storage.get(KEY_USER_ID);
        storage.remove(KEY_USER_ID);
        storage.remove(KEY_LAST_ACTIVITY);
        storage.remove(KEY_RESET_COMPLETED);
        drop(storage);
        if let Some(user) = user {
            log_auth_event("session_end", &user, true, None);
        }
    }

    /// End the session if it has idled out. Returns true when it did; the
    /// idle watchdog calls this once a minute.
    pub fn expire_if_idle(&self) -> bool {
        if self.is_expired() {
            info!("Session idle timeout reached; signing out");
            self.end_session();
            return true;
        }
        false
    }

    /// Set the one-shot marker recording that a password reset finished.
    pub fn mark_reset_completed(&self) {
        self.storage.lock().unwrap().set(KEY_RESET_COMPLETED, "true");
    }

    /// Read the completion flag without clearing it.
    pub fn reset_completed(&self) -> bool {
        self.storage
            .lock()
            .unwrap()
            .get(KEY_RESET_COMPLETED)
            .as_deref()
            == Some("true")
    }

    /// Return the completion flag and clear it in the same step.
    pub fn consume_reset_completed(&self) -> bool {
        let mut storage = self.storage.lock().unwrap();
        let set = storage.get(KEY_RESET_COMPLETED).as_deref() == Some("true");
        storage.remove(KEY_RESET_COMPLETED);
        set
    }

    /// Clear the completion flag unconditionally.
    pub fn clear_reset_completed(&self) {
        self.storage.lock().unwrap().remove(KEY_RESET_COMPLETED);
    }
}
