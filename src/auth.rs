//! Account panel state: the login/signup form and the session lifecycle.
//!
//! The panel is a small state machine. `LoggedOut` has two modes (login and
//! signup) sharing one form; a successful submit from either transitions to
//! `LoggedIn`, where the panel shows the session's bookmarked articles
//! instead of the form. Logout is the explicit reverse transition.
//!
//! Like [`crate::news::NewsPanel`], all methods are pure transitions; the
//! actual HTTP submit happens in a background task that reports back via
//! [`AuthPanel::apply_submit`].

use std::collections::BTreeSet;

use secrecy::SecretString;

use crate::api::{ApiError, Credentials};

pub const SIGNUP_SUCCESS_MESSAGE: &str = "User registered successfully";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

/// Shown for transport and decode failures alike; only an API-reported
/// `error` message is surfaced verbatim.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong, please try again later.";

/// Which logged-out flavor the form submits as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Signup => "Signup",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login for Personalised Feed",
            AuthMode::Signup => "Signup for Personalised Feed",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

/// Session lifecycle for one process run. Nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    LoggedOut,
    LoggedIn,
}

/// Outcome of a submit, rendered to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub success: bool,
    pub message: String,
}

/// Which form control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Username,
    Password,
    /// Index into the panel's preference options. Signup mode only.
    Preference(usize),
}

/// The credentials/preferences form.
///
/// Fields are always defined; "empty" is the empty string / the default
/// preference selection, never an absent value.
#[derive(Clone)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    pub preferences: BTreeSet<String>,
}

impl std::fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("preferences", &self.preferences)
            .finish()
    }
}

/// State of the account panel.
pub struct AuthPanel {
    /// Preference choices offered in signup mode, in display order.
    options: Vec<String>,
    pub mode: AuthMode,
    pub session: Session,
    pub form: AuthForm,
    pub status: Option<Status>,
    /// A submit is outstanding; further submits are ignored until it
    /// resolves.
    pub in_flight: bool,
    pub focus: FormField,
}

impl AuthPanel {
    pub fn new(options: Vec<String>) -> Self {
        let form = Self::initial_form(&options);
        Self {
            options,
            mode: AuthMode::Login,
            session: Session::LoggedOut,
            form,
            status: None,
            in_flight: false,
            focus: FormField::Username,
        }
    }

    /// The initial form: empty credentials, every preference selected.
    fn initial_form(options: &[String]) -> AuthForm {
        AuthForm {
            username: String::new(),
            password: String::new(),
            preferences: options.iter().cloned().collect(),
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    // ------------------------------------------------------------------
    // Mode and form transitions
    // ------------------------------------------------------------------

    /// Switches login <-> signup, resetting form, status, and focus.
    /// No-op while logged in or while a submit is in flight.
    pub fn toggle_mode(&mut self) {
        if self.session == Session::LoggedIn || self.in_flight {
            return;
        }
        self.mode = self.mode.toggled();
        self.form = Self::initial_form(&self.options);
        self.status = None;
        self.focus = FormField::Username;
    }

    /// Toggles membership of a preference option. Signup mode only.
    pub fn toggle_preference(&mut self, option: &str) {
        if self.mode != AuthMode::Signup {
            return;
        }
        if !self.form.preferences.remove(option) {
            self.form.preferences.insert(option.to_string());
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormField::Username => self.form.username.push(c),
            FormField::Password => self.form.password.push(c),
            FormField::Preference(_) => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Username => {
                self.form.username.pop();
            }
            FormField::Password => {
                self.form.password.pop();
            }
            FormField::Preference(_) => {}
        }
    }

    /// Moves focus to the next form control. Preferences participate only
    /// in signup mode.
    pub fn next_field(&mut self) {
        self.focus = match (self.focus, self.mode) {
            (FormField::Username, _) => FormField::Password,
            (FormField::Password, AuthMode::Signup) if !self.options.is_empty() => {
                FormField::Preference(0)
            }
            (FormField::Password, _) => FormField::Username,
            (FormField::Preference(i), _) if i + 1 < self.options.len() => {
                FormField::Preference(i + 1)
            }
            (FormField::Preference(_), _) => FormField::Username,
        };
    }

    pub fn prev_field(&mut self) {
        self.focus = match (self.focus, self.mode) {
            (FormField::Username, AuthMode::Signup) if !self.options.is_empty() => {
                FormField::Preference(self.options.len() - 1)
            }
            (FormField::Username, _) => FormField::Password,
            (FormField::Password, _) => FormField::Username,
            (FormField::Preference(0), _) => FormField::Password,
            (FormField::Preference(i), _) => FormField::Preference(i - 1),
        };
    }

    // ------------------------------------------------------------------
    // Submit lifecycle
    // ------------------------------------------------------------------

    /// Starts a submit, returning the credentials to send, or `None` when
    /// a submit is already outstanding or the session is logged in.
    ///
    /// Preferences travel in both modes; the service ignores them on login.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.in_flight || self.session == Session::LoggedIn {
            return None;
        }
        self.in_flight = true;
        Some(Credentials {
            username: self.form.username.clone(),
            password: SecretString::from(self.form.password.clone()),
            preferences: self.form.preferences.iter().cloned().collect(),
        })
    }

    /// Applies the submit outcome.
    ///
    /// An API-rejected submit surfaces the service's message verbatim and
    /// stays logged out; transport/decode failures collapse to the generic
    /// message. Success transitions to `LoggedIn`.
    pub fn apply_submit(&mut self, result: Result<(), ApiError>) {
        self.in_flight = false;
        match result {
            Ok(()) => {
                let message = match self.mode {
                    AuthMode::Signup => SIGNUP_SUCCESS_MESSAGE,
                    AuthMode::Login => LOGIN_SUCCESS_MESSAGE,
                };
                self.status = Some(Status {
                    success: true,
                    message: message.to_string(),
                });
                self.session = Session::LoggedIn;
                tracing::info!(username = %self.form.username, "Session established");
            }
            Err(ApiError::Rejected(message)) => {
                tracing::info!(error = %message, "Submit rejected by service");
                self.status = Some(Status {
                    success: false,
                    message,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Submit failed");
                self.status = Some(Status {
                    success: false,
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                });
            }
        }
    }

    /// Label for the submit control: reflects in-flight state, then reverts
    /// to the mode-appropriate label whatever the outcome was.
    pub fn submit_label(&self) -> &'static str {
        if self.in_flight {
            "Submitting..."
        } else {
            self.mode.submit_label()
        }
    }

    /// Explicit reverse transition out of `LoggedIn`, back to the login
    /// form in its initial state.
    pub fn logout(&mut self) {
        if self.session != Session::LoggedIn {
            return;
        }
        self.session = Session::LoggedOut;
        self.mode = AuthMode::Login;
        self.form = Self::initial_form(&self.options);
        self.status = None;
        self.focus = FormField::Username;
        tracing::info!("Session ended");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options() -> Vec<String> {
        crate::news::DEFAULT_CATEGORIES
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn panel() -> AuthPanel {
        AuthPanel::new(options())
    }

    #[test]
    fn test_initial_state() {
        let panel = panel();
        assert_eq!(panel.mode, AuthMode::Login);
        assert_eq!(panel.session, Session::LoggedOut);
        assert!(panel.form.username.is_empty());
        assert!(panel.form.password.is_empty());
        // Every preference starts selected.
        assert_eq!(panel.form.preferences.len(), panel.options().len());
        assert_eq!(panel.submit_label(), "Login");
    }

    #[test]
    fn test_toggle_mode_resets_form() {
        let mut panel = panel();
        panel.form.username.push_str("alice");
        panel.form.password.push_str("secret");
        panel.toggle_preference("science"); // no-op in login mode
        panel.status = Some(Status {
            success: false,
            message: "old".to_string(),
        });

        panel.toggle_mode();

        assert_eq!(panel.mode, AuthMode::Signup);
        assert!(panel.form.username.is_empty());
        assert!(panel.form.password.is_empty());
        assert_eq!(panel.form.preferences.len(), panel.options().len());
        assert!(panel.status.is_none());
        assert_eq!(panel.focus, FormField::Username);
        assert_eq!(panel.submit_label(), "Signup");
    }

    #[test]
    fn test_toggle_mode_blocked_in_flight() {
        let mut panel = panel();
        panel.begin_submit().unwrap();
        panel.toggle_mode();
        assert_eq!(panel.mode, AuthMode::Login);
    }

    #[test]
    fn test_toggle_preference_signup_only() {
        let mut panel = panel();

        // Login mode: ignored.
        panel.toggle_preference("science");
        assert!(panel.form.preferences.contains("science"));

        panel.toggle_mode();
        panel.toggle_preference("science");
        assert!(!panel.form.preferences.contains("science"));
        panel.toggle_preference("science");
        assert!(panel.form.preferences.contains("science"));
    }

    #[test]
    fn test_rejected_submit_stays_logged_out_with_verbatim_message() {
        let mut panel = panel();
        panel.begin_submit().unwrap();
        panel.apply_submit(Err(ApiError::Rejected("bad credentials".to_string())));

        assert_eq!(panel.session, Session::LoggedOut);
        let status = panel.status.unwrap();
        assert!(!status.success);
        assert_eq!(status.message, "bad credentials");
    }

    #[test]
    fn test_signup_success_transitions_and_reports() {
        let mut panel = panel();
        panel.toggle_mode(); // -> Signup
        panel.begin_submit().unwrap();
        panel.apply_submit(Ok(()));

        assert_eq!(panel.session, Session::LoggedIn);
        let status = panel.status.clone().unwrap();
        assert!(status.success);
        assert_eq!(status.message, SIGNUP_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_login_success_message() {
        let mut panel = panel();
        panel.begin_submit().unwrap();
        panel.apply_submit(Ok(()));
        assert_eq!(panel.status.unwrap().message, LOGIN_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_transport_failure_generic_message() {
        let mut panel = panel();
        panel.begin_submit().unwrap();
        panel.apply_submit(Err(ApiError::Timeout));

        assert_eq!(panel.session, Session::LoggedOut);
        assert_eq!(panel.status.unwrap().message, GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_submit_label_lifecycle() {
        let mut panel = panel();
        assert_eq!(panel.submit_label(), "Login");

        panel.begin_submit().unwrap();
        assert_eq!(panel.submit_label(), "Submitting...");

        // Label reverts regardless of outcome.
        panel.apply_submit(Err(ApiError::Timeout));
        assert_eq!(panel.submit_label(), "Login");
    }

    #[test]
    fn test_double_submit_ignored() {
        let mut panel = panel();
        assert!(panel.begin_submit().is_some());
        assert!(panel.begin_submit().is_none());
    }

    #[test]
    fn test_submit_blocked_when_logged_in() {
        let mut panel = panel();
        panel.begin_submit().unwrap();
        panel.apply_submit(Ok(()));
        assert!(panel.begin_submit().is_none());
    }

    #[test]
    fn test_credentials_carry_current_form() {
        let mut panel = panel();
        panel.toggle_mode(); // Signup: preferences editable
        panel.form.username.push_str("bob");
        panel.form.password.push_str("pw");
        panel.toggle_preference("sports");

        let creds = panel.begin_submit().unwrap();
        assert_eq!(creds.username, "bob");
        assert_eq!(creds.preferences.len(), panel.options().len() - 1);
        assert!(!creds.preferences.contains(&"sports".to_string()));
    }

    #[test]
    fn test_logout_returns_to_initial_login_form() {
        let mut panel = panel();
        panel.begin_submit().unwrap();
        panel.apply_submit(Ok(()));
        assert_eq!(panel.session, Session::LoggedIn);

        panel.logout();

        assert_eq!(panel.session, Session::LoggedOut);
        assert_eq!(panel.mode, AuthMode::Login);
        assert!(panel.form.username.is_empty());
        assert!(panel.status.is_none());
    }

    #[test]
    fn test_field_focus_cycle_login_skips_preferences() {
        let mut panel = panel();
        assert_eq!(panel.focus, FormField::Username);
        panel.next_field();
        assert_eq!(panel.focus, FormField::Password);
        panel.next_field();
        assert_eq!(panel.focus, FormField::Username);
    }

    #[test]
    fn test_field_focus_cycle_signup_includes_preferences() {
        let mut panel = panel();
        panel.toggle_mode();
        panel.next_field(); // -> Password
        panel.next_field(); // -> Preference(0)
        assert_eq!(panel.focus, FormField::Preference(0));

        for _ in 1..panel.options().len() {
            panel.next_field();
        }
        assert_eq!(
            panel.focus,
            FormField::Preference(panel.options().len() - 1)
        );
        panel.next_field();
        assert_eq!(panel.focus, FormField::Username);

        panel.prev_field();
        assert_eq!(
            panel.focus,
            FormField::Preference(panel.options().len() - 1)
        );
    }

    #[test]
    fn test_char_editing_targets_focused_field() {
        let mut panel = panel();
        panel.push_char('a');
        panel.push_char('b');
        panel.next_field();
        panel.push_char('x');
        panel.backspace();
        panel.push_char('y');

        assert_eq!(panel.form.username, "ab");
        assert_eq!(panel.form.password, "y");
    }

    #[test]
    fn test_form_debug_redacts_password() {
        let mut panel = panel();
        panel.form.password.push_str("topsecret");
        let debug = format!("{:?}", panel.form);
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
