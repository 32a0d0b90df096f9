use std::fmt;

use super::session::SessionStore;
use crate::modules::utils::logging::log_navigation;

/// The application's routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login / register entrance, `/`
    Entrance,
    HomeScreen,
    ForgotPassword,
    ResetPassword,
    ChangePassword,
}

impl Route {
    /// Whether the route shows protected content. The entrance and the
    /// forgot-password flow are reachable without a session.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Entrance | Route::ForgotPassword)
    }

    pub fn as_path(&self) -> &'static str {
        match self {
            Route::Entrance => "/",
            Route::HomeScreen => "/home-screen",
            Route::ForgotPassword => "/forgot-password",
            Route::ResetPassword => "/reset-password",
            Route::ChangePassword => "/change-password",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Transient navigation state carried between routes, never persisted.
/// `user_id` is how a verified-but-not-logged-in user travels to the
/// reset-password screen; `from` remembers the route a login bounce came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub user_id: Option<String>,
    pub from: Option<Route>,
}

impl NavState {
    pub fn with_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            from: None,
        }
    }
}

/// What the gate wants done with the requested route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Render,
    Redirect { to: Route, state: NavState },
}

/// A gate decision. Clearing the completion flag is an explicit output, not
/// a hidden mutation, so the decision function stays pure and testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub clear_completion: bool,
}

/// Everything the decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    pub route: Route,
    /// The persisted session's user id, already filtered for expiry.
    pub session_user: Option<&'a str>,
    /// Transient user id from navigation state (the "verified" signal).
    pub nav_user_id: Option<&'a str>,
    /// Whether the persisted completion flag is currently set.
    pub reset_completed: bool,
}

/// Route-guard decision, first match wins:
///
/// 1. reset-password with a live session: back to the home screen.
/// 2. reset-password without completed verification: back to forgot-password.
/// 3. protected route, no session, no verified signal: to the entrance,
///    remembering `from`. Public routes stay reachable while logged out.
/// 4. verified but not logged in, reset not yet completed: forced to
///    reset-password before anything else renders.
/// 5. otherwise render, consuming the completion flag.
pub fn decide(input: GateInput) -> Decision {
    let verified = input.session_user.is_none() && input.nav_user_id.is_some();
    let on_reset = input.route == Route::ResetPassword;

    if on_reset && input.session_user.is_some() {
        return Decision {
            action: Action::Redirect {
                to: Route::HomeScreen,
                state: NavState::default(),
            },
            clear_completion: false,
        };
    }

    if on_reset && input.session_user.is_none() && !verified {
        return Decision {
            action: Action::Redirect {
                to: Route::ForgotPassword,
                state: NavState::default(),
            },
            clear_completion: false,
        };
    }

    if input.route.requires_auth() && input.session_user.is_none() && !verified && !on_reset {
        return Decision {
            action: Action::Redirect {
                to: Route::Entrance,
                state: NavState {
                    user_id: None,
                    from: Some(input.route),
                },
            },
            clear_completion: true,
        };
    }

    if verified && !input.reset_completed && !on_reset {
        return Decision {
            action: Action::Redirect {
                to: Route::ResetPassword,
                state: NavState {
                    user_id: input.nav_user_id.map(|id| id.to_string()),
                    from: None,
                },
            },
            clear_completion: true,
        };
    }

    Decision {
        action: Action::Render,
        clear_completion: true,
    }
}

/// Thin adapter around `decide`: reads the store, applies the flag-clearing
/// output, ends an idled-out session and refreshes a live one.
pub fn resolve(store: &SessionStore, route: Route, nav: &NavState) -> Action {
    if store.is_expired() {
        store.end_session();
    }
    let session_user = store.valid_user();

    let decision = decide(GateInput {
        route,
        session_user: session_user.as_deref(),
        nav_user_id: nav.user_id.as_deref(),
        reset_completed: store.reset_completed(),
    });

    if decision.clear_completion {
        store.clear_reset_completed();
    }
    if session_user.is_some() {
        store.touch();
    }

    if let Action::Redirect { to, .. } = &decision.action {
        log_navigation(route.as_path(), to.as_path(), "auth gate");
    }
    decision.action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::store::MemoryStorage;
    use crate::modules::utils::time::ManualClock;
    use crate::SESSION_TIMEOUT_MS;
    use std::sync::Arc;

    fn input<'a>(
        route: Route,
        session_user: Option<&'a str>,
        nav_user_id: Option<&'a str>,
        reset_completed: bool,
    ) -> GateInput<'a> {
        GateInput {
            route,
            session_user,
            nav_user_id,
            reset_completed,
        }
    }

    #[test]
    fn test_authenticated_user_cannot_reenter_reset() {
        let decision = decide(input(Route::ResetPassword, Some("u1"), None, false));
        assert_eq!(
            decision.action,
            Action::Redirect {
                to: Route::HomeScreen,
                state: NavState::default(),
            }
        );
        assert!(!decision.clear_completion);
    }

    #[test]
    fn test_reset_unreachable_without_verification() {
        let decision = decide(input(Route::ResetPassword, None, None, false));
        assert_eq!(
            decision.action,
            Action::Redirect {
                to: Route::ForgotPassword,
                state: NavState::default(),
            }
        );
        assert!(!decision.clear_completion);
    }

    #[test]
    fn test_logged_out_entrance_renders() {
        // The login menu itself must never be gated, or nothing can render.
        let decision = decide(input(Route::Entrance, None, None, false));
        assert_eq!(decision.action, Action::Render);
    }

    #[test]
    fn test_logged_out_forgot_password_renders() {
        let decision = decide(input(Route::ForgotPassword, None, None, false));
        assert_eq!(decision.action, Action::Render);
    }

    #[test]
    fn test_unauthenticated_protected_route_bounces_to_login() {
        let decision = decide(input(Route::HomeScreen, None, None, false));
        assert_eq!(
            decision.action,
            Action::Redirect {
                to: Route::Entrance,
                state: NavState {
                    user_id: None,
                    from: Some(Route::HomeScreen),
                },
            }
        );
        assert!(decision.clear_completion);
    }

    #[test]
    fn test_verified_user_is_forced_through_reset() {
        let decision = decide(input(Route::HomeScreen, None, Some("u7"), false));
        assert_eq!(
            decision.action,
            Action::Redirect {
                to: Route::ResetPassword,
                state: NavState {
                    user_id: Some("u7".to_string()),
                    from: None,
                },
            }
        );
        assert!(decision.clear_completion);
    }

    #[test]
    fn test_verified_user_with_completed_reset_renders_once() {
        // The one-shot flag bridges the moment between reset and re-login.
        let decision = decide(input(Route::HomeScreen, None, Some("u7"), true));
        assert_eq!(decision.action, Action::Render);
        assert!(decision.clear_completion);
    }

    #[test]
    fn test_verified_user_reaches_reset_screen() {
        let decision = decide(input(Route::ResetPassword, None, Some("u7"), false));
        assert_eq!(decision.action, Action::Render);
        assert!(decision.clear_completion);
    }

    #[test]
    fn test_authenticated_user_renders_protected_routes() {
        for route in [Route::HomeScreen, Route::ChangePassword, Route::Entrance] {
            let decision = decide(input(route, Some("u1"), None, false));
            assert_eq!(decision.action, Action::Render, "route {}", route);
            assert!(decision.clear_completion);
        }
    }

    fn store_with_clock() -> (SessionStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(5_000_000));
        let store = SessionStore::new(Box::new(MemoryStorage::new()), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_resolve_applies_flag_clearing() {
        let (store, _clock) = store_with_clock();
        store.start_session("u1");
        store.mark_reset_completed();

        let action = resolve(&store, Route::HomeScreen, &NavState::default());
        assert_eq!(action, Action::Render);
        assert!(!store.reset_completed());
    }

    #[test]
    fn test_resolve_touches_live_session() {
        let (store, clock) = store_with_clock();
        store.start_session("u1");

        clock.advance_ms(SESSION_TIMEOUT_MS - 1);
        let action = resolve(&store, Route::HomeScreen, &NavState::default());
        assert_eq!(action, Action::Render);

        // The visit refreshed the window, so the same advance again stays live.
        clock.advance_ms(SESSION_TIMEOUT_MS - 1);
        assert!(!store.is_expired());
    }

    #[test]
    fn test_resolve_ends_expired_session_and_redirects() {
        let (store, clock) = store_with_clock();
        store.start_session("u1");
        clock.advance_ms(SESSION_TIMEOUT_MS + 1);

        let action = resolve(&store, Route::HomeScreen, &NavState::default());
        assert_eq!(
            action,
            Action::Redirect {
                to: Route::Entrance,
                state: NavState {
                    user_id: None,
                    from: Some(Route::HomeScreen),
                },
            }
        );
        // The expired session was not resurrected by the touch.
        assert_eq!(store.valid_user(), None);
    }

    #[test]
    fn test_resolve_renders_public_routes_on_fresh_start() {
        // Fresh start: empty store, default navigation state. The entrance
        // and the forgot-password flow must render, not redirect, otherwise
        // the navigation loop chases its own redirect forever.
        let (store, _clock) = store_with_clock();
        for route in [Route::Entrance, Route::ForgotPassword] {
            let action = resolve(&store, route, &NavState::default());
            assert_eq!(action, Action::Render, "route {}", route);
        }
    }

    #[test]
    fn test_decide_never_mutates_state() {
        // Same input twice gives the same decision; purity is the contract.
        let first = decide(input(Route::HomeScreen, None, Some("u7"), false));
        let second = decide(input(Route::HomeScreen, None, Some("u7"), false));
        assert_eq!(first, second);
    }
}
