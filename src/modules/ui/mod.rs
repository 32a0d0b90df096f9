use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::info;

use crate::modules::api::ApiClient;
use crate::modules::auth::account::{self, Registration};
use crate::modules::auth::gate::{self, Action, NavState, Route};
use crate::modules::auth::reset_flow::{FlowEvent, ResetFlowController};
use crate::modules::auth::session::SessionStore;
use crate::modules::customers::{self, Customer};
use crate::modules::utils::interval::IntervalTask;
use crate::modules::utils::io::{prompt, prompt_password, read_line};
use crate::modules::utils::time::{format_countdown, Clock};
use crate::IDLE_CHECK_PERIOD_SECS;

/// Where a screen sends the user next.
enum ScreenResult {
    Goto(Route, NavState),
    Exit,
}

/// The terminal application: owns the collaborators and walks between
/// screens, asking the auth gate before every render.
pub struct App {
    client: Box<dyn ApiClient>,
    store: SessionStore,
    clock: Arc<dyn Clock>,
}

impl App {
    pub fn new(client: Box<dyn ApiClient>, store: SessionStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            store,
            clock,
        }
    }

    /// Main navigation loop. The idle watchdog runs for as long as the app
    /// does and is cancelled (joined) on the way out.
    pub fn run(&self) {
        let watchdog_store = self.store.clone();
        let watchdog = IntervalTask::spawn(
            Duration::from_secs(IDLE_CHECK_PERIOD_SECS),
            move || {
                watchdog_store.expire_if_idle();
                true
            },
        );

        let mut route = Route::Entrance;
        let mut nav = NavState::default();

        loop {
            // Every route change passes through the gate; redirects carry
            // their own navigation state.
            match gate::resolve(&self.store, route, &nav) {
                Action::Redirect { to, state } => {
                    route = to;
                    nav = state;
                    continue;
                }
                Action::Render => {}
            }

            let result = match route {
                Route::Entrance => self.entrance_screen(),
                Route::HomeScreen => self.home_screen(&nav),
                Route::ForgotPassword => self.forgot_password_screen(),
                Route::ResetPassword => self.reset_password_screen(&nav),
                Route::ChangePassword => self.change_password_screen(&nav),
            };

            match result {
                ScreenResult::Goto(next, state) => {
                    route = next;
                    nav = state;
                }
                ScreenResult::Exit => break,
            }
        }

        watchdog.cancel();
    }

    // ----- entrance ---------------------------------------------------

    fn entrance_screen(&self) -> ScreenResult {
        loop {
            println!("\n=== Customer Management ===");
            println!("1. Login                  (or type 'login')");
            println!("2. Register new account   (or type 'register')");
            println!("3. Forgot password        (or type 'forgot')");
            println!("4. Exit                   (or type 'exit')");
            println!("\nEnter your choice         (1-4 or command):");

            let choice = match read_line() {
                Ok(input) => input.to_lowercase(),
                Err(e) => {
                    println!("Error reading input: {}", e);
                    continue;
                }
            };

            match choice.as_str() {
                "1" | "login" => {
                    if let Some(result) = self.login_form() {
                        return result;
                    }
                }
                "2" | "register" => self.register_form(),
                "3" | "forgot" => {
                    return ScreenResult::Goto(Route::ForgotPassword, NavState::default());
                }
                "4" | "exit" | "quit" => {
                    println!("Goodbye!");
                    return ScreenResult::Exit;
                }
                _ => {
                    println!("Invalid choice. Please enter 1-4 or a command.");
                }
            }
        }
    }

    fn login_form(&self) -> Option<ScreenResult> {
        let email = match prompt("Email (or 'back')") {
            Ok(input) => input,
            Err(e) => {
                println!("Error reading input: {}", e);
                return None;
            }
        };
        if email.eq_ignore_ascii_case("back") {
            return None;
        }

        let password = match prompt_password("Password") {
            Ok(pwd) => pwd,
            Err(e) => {
                println!("Error reading password: {}", e);
                return None;
            }
        };

        match account::login(self.client.as_ref(), &self.store, &email, &password) {
            Ok(user_id) => {
                println!("Login successful!");
                Some(ScreenResult::Goto(
                    Route::HomeScreen,
                    NavState::with_user(&user_id),
                ))
            }
            Err(message) => {
                println!("{}", message);
                None
            }
        }
    }

    fn register_form(&self) {
        println!("\n=== Create Account ===");
        let mut form = Registration::default();

        let fields: [(&str, bool); 5] = [
            ("First name", false),
            ("Last name", false),
            ("Email", false),
            ("Password", true),
            ("Confirm password", true),
        ];
        for (label, secret) in fields {
            let value = if secret {
                prompt_password(label)
            } else {
                prompt(label)
            };
            let value = match value {
                Ok(v) => v,
                Err(e) => {
                    println!("Error reading input: {}", e);
                    return;
                }
            };
            match label {
                "First name" => form.first_name = value,
                "Last name" => form.last_name = value,
                "Email" => form.email = value,
                "Password" => form.password = value,
                _ => form.confirm_password = value,
            }
        }

        match account::register(self.client.as_ref(), &form) {
            Ok(()) => println!("Registration successful! You can log in now."),
            Err(message) => println!("{}", message),
        }
    }

    // ----- home / customers -------------------------------------------

    fn home_screen(&self, nav: &NavState) -> ScreenResult {
        let mut customers = customers::fetch_all(self.client.as_ref()).unwrap_or_default();
        loop {
            render_customer_list(&customers);
            println!("\n1. Refresh   2. Add customer   3. Change password   4. Logout   5. Exit");

            let choice = match read_line() {
                Ok(input) => input,
                Err(e) => {
                    println!("Error reading input: {}", e);
                    continue;
                }
            };

            // The watchdog may have ended the session while we sat on
            // stdin; re-resolving the gate turns that into a bounce.
            if self.store.valid_user().is_none() {
                println!("\nSession expired due to inactivity. Please log in again.");
                return ScreenResult::Goto(Route::Entrance, NavState::default());
            }
            self.store.touch();

            match choice.as_str() {
                "1" => {
                    if let Ok(fresh) = customers::fetch_all(self.client.as_ref()) {
                        customers = fresh;
                    }
                }
                "2" => {
                    if self.add_customer_form() {
                        if let Ok(fresh) = customers::fetch_all(self.client.as_ref()) {
                            customers = fresh;
                        }
                    }
                }
                "3" => {
                    return ScreenResult::Goto(Route::ChangePassword, nav.clone());
                }
                "4" => {
                    self.store.end_session();
                    println!("Logged out.");
                    return ScreenResult::Goto(Route::Entrance, NavState::default());
                }
                "5" => return ScreenResult::Exit,
                _ => println!("Invalid choice."),
            }
        }
    }

    /// Collect the customer fields and submit. Failures are logged, not
    /// surfaced; the list simply stays as it was.
    fn add_customer_form(&self) -> bool {
        println!("\n=== Add Customer ===");
        let mut values = Vec::with_capacity(5);
        for label in ["First name", "Last name", "Phone", "Email", "Birthday (YYYY-MM-DD)"] {
            match prompt(label) {
                Ok(value) => values.push(value),
                Err(e) => {
                    println!("Error reading input: {}", e);
                    return false;
                }
            }
        }

        let customer = Customer::new(&values[0], &values[1], &values[2], &values[3], &values[4]);
        match customers::add(self.client.as_ref(), &customer) {
            Ok(()) => {
                println!("Customer added.");
                true
            }
            Err(_) => {
                println!("Could not add customer right now.");
                false
            }
        }
    }

    // ----- password recovery ------------------------------------------

    fn forgot_password_screen(&self) -> ScreenResult {
        println!("\n=== Forgot Password ===");
        println!("Enter your email address to receive a verification code.");

        // The controller lives and dies with this screen.
        let mut flow = ResetFlowController::new();

        let email = loop {
            let input = match prompt("Email (or 'back')") {
                Ok(input) => input,
                Err(e) => {
                    println!("Error reading input: {}", e);
                    continue;
                }
            };
            if input.eq_ignore_ascii_case("back") {
                return ScreenResult::Goto(Route::Entrance, NavState::default());
            }

            match flow.submit_email(&input, self.client.as_ref(), self.clock.now_ms()) {
                FlowEvent::CodeSent => {
                    println!("Verification code sent to your email.");
                    break input;
                }
                FlowEvent::Invalid(message) | FlowEvent::Rejected(message) => {
                    println!("{}", message);
                }
                _ => {}
            }
        };

        loop {
            let now = self.clock.now_ms();
            println!(
                "\nResend in {}  (enter code, 'resend', or 'back')",
                format_countdown(flow.countdown_remaining(now))
            );

            let input = match read_line() {
                Ok(input) => input,
                Err(e) => {
                    println!("Error reading input: {}", e);
                    continue;
                }
            };

            match input.to_lowercase().as_str() {
                "back" => return ScreenResult::Goto(Route::Entrance, NavState::default()),
                "resend" => {
                    match flow.resend(&email, self.client.as_ref(), self.clock.now_ms()) {
                        FlowEvent::CodeSent => println!("A new code is on its way."),
                        FlowEvent::Rejected(message) => println!("{}", message),
                        FlowEvent::Ignored => println!(
                            "Resend available in {}.",
                            format_countdown(flow.countdown_remaining(self.clock.now_ms()))
                        ),
                        _ => {}
                    }
                }
                _ => match flow.submit_code(&input, self.client.as_ref()) {
                    FlowEvent::Verified { user_id } => {
                        println!("Code verified.");
                        return ScreenResult::Goto(
                            Route::ResetPassword,
                            NavState::with_user(&user_id),
                        );
                    }
                    FlowEvent::Rejected(message) => println!("{}", message),
                    _ => {}
                },
            }
        }
    }

    fn reset_password_screen(&self, nav: &NavState) -> ScreenResult {
        println!("\n=== Reset Password ===");
        println!("Enter your new password below.");

        loop {
            let new_password = match prompt_password("New password") {
                Ok(pwd) => pwd,
                Err(e) => {
                    println!("Error reading password: {}", e);
                    continue;
                }
            };
            let confirm = match prompt_password("Confirm new password") {
                Ok(pwd) => pwd,
                Err(e) => {
                    println!("Error reading password: {}", e);
                    continue;
                }
            };

            match account::reset_password(
                self.client.as_ref(),
                &self.store,
                nav.user_id.as_deref(),
                &new_password,
                &confirm,
            ) {
                Ok(post) => {
                    println!("Password reset successfully!");
                    // Let the message sit before bouncing back to login.
                    thread::sleep(post.delay);
                    return ScreenResult::Goto(post.redirect_to, NavState::default());
                }
                Err(message) => {
                    println!("{}", message);
                    if nav.user_id.is_none() {
                        // Nothing the user types here can fix a missing id.
                        return ScreenResult::Goto(Route::ForgotPassword, NavState::default());
                    }
                }
            }
        }
    }

    fn change_password_screen(&self, nav: &NavState) -> ScreenResult {
        println!("\n=== Change Password ===");

        let user_id = match self.store.valid_user().or_else(|| nav.user_id.clone()) {
            Some(id) => id,
            None => return ScreenResult::Goto(Route::Entrance, NavState::default()),
        };

        loop {
            let old_password = match prompt_password("Old password (or leave empty to cancel)") {
                Ok(pwd) => pwd,
                Err(e) => {
                    println!("Error reading password: {}", e);
                    continue;
                }
            };
            if old_password.is_empty() {
                return ScreenResult::Goto(Route::HomeScreen, nav.clone());
            }
            let new_password = match prompt_password("New password") {
                Ok(pwd) => pwd,
                Err(e) => {
                    println!("Error reading password: {}", e);
                    continue;
                }
            };
            let confirm = match prompt_password("Confirm new password") {
                Ok(pwd) => pwd,
                Err(e) => {
                    println!("Error reading password: {}", e);
                    continue;
                }
            };

            match account::change_password(
                self.client.as_ref(),
                &user_id,
                &old_password,
                &new_password,
                &confirm,
            ) {
                Ok(()) => {
                    println!("Password changed successfully! Please log in again.");
                    info!("Password changed; ending session");
                    self.store.end_session();
                    return ScreenResult::Goto(Route::Entrance, NavState::default());
                }
                Err(message) => println!("{}", message),
            }
        }
    }
}

fn render_customer_list(customers: &[Customer]) {
    println!("\n=== Customers ===");
    if customers.is_empty() {
        println!("No customers available.");
        return;
    }
    for (index, customer) in customers.iter().enumerate() {
        println!(
            "{:>3}. {:<30} {:<16} {:<30} {}",
            index + 1,
            customer.display_name(),
            customer.phone,
            customer.email,
            customer.birthday
        );
    }
}
