/// Minimum accepted password length. The web client's forms disagreed on the
/// threshold (8 in one, 10 in another); the strictest variant wins here and
/// every flow shares it.
pub const MIN_PASSWORD_LENGTH: usize = 10;

/// Which rules a candidate password satisfies, one flag per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyReport {
    pub length: bool,
    pub mixed_case: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

impl PolicyReport {
    pub fn is_valid(&self) -> bool {
        self.length && self.mixed_case && self.has_digit && self.has_special
    }

    /// One line naming the failed rules, for inline form messages.
    pub fn failure_summary(&self) -> String {
        let mut missing = Vec::new();
        if !self.length {
            missing.push(format!("at least {} characters", MIN_PASSWORD_LENGTH));
        }
        if !self.mixed_case {
            missing.push("both uppercase and lowercase letters".to_string());
        }
        if !self.has_digit {
            missing.push("a digit".to_string());
        }
        if !self.has_special {
            missing.push("a special character".to_string());
        }
        format!("Password must contain {}.", missing.join(", "))
    }
}

/// Evaluate a candidate password against the rule set. Pure; no I/O.
pub fn evaluate(password: &str) -> PolicyReport {
    PolicyReport {
        length: password.chars().count() >= MIN_PASSWORD_LENGTH,
        mixed_case: password.chars().any(|c| c.is_lowercase())
            && password.chars().any(|c| c.is_uppercase()),
        has_digit: password.chars().any(|c| c.is_ascii_digit()),
        has_special: password.chars().any(|c| !c.is_alphanumeric()),
    }
}

/// A password is accepted only when every rule holds.
pub fn is_valid(password: &str) -> bool {
    evaluate(password).is_valid()
}
