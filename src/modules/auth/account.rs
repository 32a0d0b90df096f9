use std::time::Duration;

use super::gate::Route;
use super::password;
use super::session::SessionStore;
use crate::modules::api::{ApiClient, ApiError, TRANSPORT_ERROR};
use crate::modules::api::types::RegisterRequest;
use crate::modules::utils::logging::log_auth_event;
use crate::modules::utils::validate::{is_valid_email, username_from_email};
use crate::POST_RESET_REDIRECT_DELAY_SECS;

/// Shown for every login failure, client- or server-side, so responses never
/// reveal whether the account exists.
pub const GENERIC_LOGIN_ERROR: &str = "Invalid username or password. Please try again.";

const CHANGE_FALLBACK: &str = "Password change failed. Please try again.";
const REUSE_FALLBACK: &str = "New password must be different from your current password.";
const RESET_FALLBACK: &str = "Password reset failed. Please try again.";

/// Instruction returned by a successful reset: let the success message sit
/// for a moment, then go back to the login screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReset {
    pub redirect_to: Route,
    pub delay: Duration,
}

/// Attempt a login. On success the session is started with the server's
/// user id, which is also returned for navigation state.
pub fn login(
    client: &dyn ApiClient,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<String, String> {
    // Format failures get the same generic message as bad credentials.
    if !is_valid_email(email) {
        return Err(GENERIC_LOGIN_ERROR.to_string());
    }

    let username = username_from_email(email);
    match client.login(username, password) {
        Ok(response) => {
            let user_id = response.user.user_id;
            store.start_session(&user_id);
            log_auth_event("login", username, true, None);
            Ok(user_id)
        }
        Err(ApiError::Transport(detail)) => {
            log_auth_event("login", username, false, Some(&detail));
            Err(TRANSPORT_ERROR.to_string())
        }
        Err(e) => {
            log_auth_event("login", username, false, Some(&e.to_string()));
            Err(GENERIC_LOGIN_ERROR.to_string())
        }
    }
}

/// Fields collected by the registration form.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Attempt a registration. Validation failures never reach the network.
pub fn register(client: &dyn ApiClient, form: &Registration) -> Result<(), String> {
    let all_filled = !form.first_name.trim().is_empty()
        && !form.last_name.trim().is_empty()
        && !form.email.trim().is_empty()
        && !form.password.is_empty()
        && !form.confirm_password.is_empty();
    if !all_filled {
        return Err("Please fill all fields.".to_string());
    }
    if !is_valid_email(&form.email) {
        return Err("Invalid email format.".to_string());
    }
    if form.password != form.confirm_password {
        return Err("Passwords do not match.".to_string());
    }
    let report = password::evaluate(&form.password);
    if !report.is_valid() {
        return Err(report.failure_summary());
    }

    let request = RegisterRequest {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        username: username_from_email(&form.email).to_string(),
        email: form.email.clone(),
        password: form.password.clone(),
    };

    match client.register(&request) {
        Ok(()) => {
            log_auth_event("register", &request.username, true, None);
            Ok(())
        }
        Err(e) => {
            log_auth_event("register", &request.username, false, Some(&e.to_string()));
            Err(e.user_message("Registration failed. Please try again."))
        }
    }
}

/// Finish the reset flow: set the new password for the verified user, mark
/// the one-shot completion flag, and tell the caller where to go next.
pub fn reset_password(
    client: &dyn ApiClient,
    store: &SessionStore,
    user_id: Option<&str>,
    new_password: &str,
    confirm_password: &str,
) -> Result<PostReset, String> {
    if new_password.is_empty() || confirm_password.is_empty() {
        return Err("Please fill all fields.".to_string());
    }
    if new_password != confirm_password {
        return Err("Passwords do not match.".to_string());
    }
    let user_id = match user_id {
        Some(id) => id,
        None => return Err("User ID missing. Please try again.".to_string()),
    };
    let report = password::evaluate(new_password);
    if !report.is_valid() {
        return Err(report.failure_summary());
    }

    match client.reset_password(user_id, new_password) {
        Ok(()) => {
            store.mark_reset_completed();
            log_auth_event("reset_password", user_id, true, None);
            Ok(PostReset {
                redirect_to: Route::Entrance,
                delay: Duration::from_secs(POST_RESET_REDIRECT_DELAY_SECS),
            })
        }
        Err(e) => {
            log_auth_event("reset_password", user_id, false, Some(&e.to_string()));
            Err(e.user_message(RESET_FALLBACK))
        }
    }
}

/// Change the password of a logged-in user. A 400 from the server means the
/// new password matched the old one.
pub fn change_password(
    client: &dyn ApiClient,
    user_id: &str,
    old_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), String> {
    if old_password.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
        return Err("Please fill all fields.".to_string());
    }
    if new_password != confirm_password {
        return Err("Passwords do not match.".to_string());
    }
    let report = password::evaluate(new_password);
    if !report.is_valid() {
        return Err(report.failure_summary());
    }

    match client.change_password(user_id, old_password, new_password) {
        Ok(()) => {
            log_auth_event("change_password", user_id, true, None);
            Ok(())
        }
        Err(e) => {
            log_auth_event("change_password", user_id, false, Some(&e.to_string()));
            let fallback = if e.status() == Some(400) {
                REUSE_FALLBACK
            } else {
                CHANGE_FALLBACK
            };
            Err(e.user_message(fallback))
        }
    }
}
