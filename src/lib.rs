// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{api, auth, customers, ui, utils};

// Re-export commonly used types
pub use modules::api::client::HttpApiClient;
pub use modules::api::{ApiClient, ApiError};
pub use modules::auth::gate::{Action, Decision, NavState, Route};
pub use modules::auth::password::PolicyReport;
pub use modules::auth::reset_flow::ResetFlowController;
pub use modules::auth::session::SessionStore;
pub use modules::customers::Customer;

// Session expiry: a session older than this without activity is dead.
pub const SESSION_TIMEOUT_MS: u64 = 30 * 60 * 1000;

// How often the idle watchdog re-checks the session while the app runs.
pub const IDLE_CHECK_PERIOD_SECS: u64 = 60;

// Resend of the verification code is locked out for this long after a send.
pub const CODE_RESEND_COOLDOWN_SECS: u64 = 300;

// Pause after a successful password reset before returning to login.
pub const POST_RESET_REDIRECT_DELAY_SECS: u64 = 2;

// Persisted storage keys, kept identical to the web client's localStorage
// keys so session files stay readable next to the original deployment.
pub const KEY_USER_ID: &str = "userId";
pub const KEY_LAST_ACTIVITY: &str = "lastActivity";
pub const KEY_RESET_COMPLETED: &str = "passwordResetCompleted";
