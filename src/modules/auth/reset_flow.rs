use log::info;

use crate::modules::api::ApiClient;
use crate::modules::utils::logging::log_auth_event;
use crate::modules::utils::validate::is_valid_email;
use crate::CODE_RESEND_COOLDOWN_SECS;

const SEND_FALLBACK: &str = "Failed to send code.";
const VERIFY_FALLBACK: &str = "Password reset failed. Please try again.";

/// Where the forgot-password flow currently stands. Advances strictly
/// forward; `Verified` is terminal and hands off to the reset screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Email,
    CodeSent,
    Verified,
}

/// Outcome of driving the flow one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// Client-side validation failed; nothing was sent over the network.
    Invalid(String),
    /// The collaborator rejected the request; the stage did not change.
    Rejected(String),
    /// A verification code is on its way (first send or resend).
    CodeSent,
    /// Verification succeeded; carry `user_id` to the reset screen as
    /// navigation state.
    Verified { user_id: String },
    /// A prior submission is still outstanding, or the action is not legal
    /// in the current stage; the input was ignored.
    Ignored,
}

/// Drives the forgot / verify / reset-password sequence: send a code to an
/// email address, verify the code, then hand the transient user id to the
/// reset screen. Owned by the forgot-password view and thrown away when the
/// user navigates elsewhere; nothing here is persisted.
pub struct ResetFlowController {
    stage: Stage,
    user_id: Option<String>,
    code_expires_at: Option<u64>,
    resend_allowed_at: Option<u64>,
    in_flight: bool,
}

impl Default for ResetFlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetFlowController {
    pub fn new() -> Self {
        Self {
            stage: Stage::Email,
            user_id: None,
            code_expires_at: None,
            resend_allowed_at: None,
            in_flight: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The transient user id returned by the send-code endpoint. Never
    /// written to the session store.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Seconds left on the code countdown, zero once it lapses.
    pub fn countdown_remaining(&self, now_ms: u64) -> u64 {
        match self.code_expires_at {
            Some(expiry) => expiry.saturating_sub(now_ms) / 1000,
            None => 0,
        }
    }

    /// Whether the resend action is currently permitted.
    pub fn resend_allowed(&self, now_ms: u64) -> bool {
        match self.resend_allowed_at {
            Some(at) => now_ms >= at,
            None => false,
        }
    }

    /// Submit the email address and request a verification code.
    pub fn submit_email(
        &mut self,
        email: &str,
        client: &dyn ApiClient,
        now_ms: u64,
    ) -> FlowEvent {
        if self.stage != Stage::Email || self.in_flight {
            return FlowEvent::Ignored;
        }
        if !is_valid_email(email) {
            return FlowEvent::Invalid("Invalid email format.".to_string());
        }
        self.request_code(email, client, now_ms)
    }

    /// Submit the verification code the user received.
    pub fn submit_code(&mut self, code: &str, client: &dyn ApiClient) -> FlowEvent {
        if self.stage != Stage::CodeSent || self.in_flight {
            return FlowEvent::Ignored;
        }
        let user_id = match self.user_id.clone() {
            Some(id) => id,
            None => return FlowEvent::Ignored,
        };

        self.in_flight = true;
        let result = client.verify_code(code, &user_id);
        self.in_flight = false;

        match result {
            Ok(()) => {
                // The only transition into the terminal stage.
                self.stage = Stage::Verified;
                log_auth_event("verify_code", &user_id, true, None);
                FlowEvent::Verified { user_id }
            }
            Err(e) => {
                // Stage, code and timers are untouched; the user may retry
                // or wait for the resend window.
                log_auth_event("verify_code", &user_id, false, Some(&e.to_string()));
                FlowEvent::Rejected(e.user_message(VERIFY_FALLBACK))
            }
        }
    }

    /// Re-request a code for the address already submitted. Only permitted
    /// once the cooldown has lapsed; resets both timers on success.
    pub fn resend(&mut self, email: &str, client: &dyn ApiClient, now_ms: u64) -> FlowEvent {
        if self.stage != Stage::CodeSent || self.in_flight {
            return FlowEvent::Ignored;
        }
        if !self.resend_allowed(now_ms) {
            return FlowEvent::Ignored;
        }
        self.request_code(email, client, now_ms)
    }

    fn request_code(&mut self, email: &str, client: &dyn ApiClient, now_ms: u64) -> FlowEvent {
        self.in_flight = true;
        let result = client.send_code(email);
        self.in_flight = false;

        match result {
            Ok(response) => {
                self.stage = Stage::CodeSent;
                self.user_id = Some(response.user_id);
                let expiry = now_ms + CODE_RESEND_COOLDOWN_SECS * 1000;
                self.code_expires_at = Some(expiry);
                self.resend_allowed_at = Some(expiry);
                info!("Verification code sent");
                FlowEvent::CodeSent
            }
            Err(e) => {
                log_auth_event("send_code", email, false, Some(&e.to_string()));
                FlowEvent::Rejected(e.user_message(SEND_FALLBACK))
            }
        }
    }
}
