//! Form validation for the login and signup screens
//!
//! Everything here is a pure function of raw field values. The backend has
//! the final word: these checks only stop obviously bad submissions early.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::models::{LoginRequest, SignupRequest};

// local@domain.tld shape only, not RFC 5322
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name regex"));

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_NAME_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    Terms,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::Terms => "agreeTerms",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Errors collected over a whole form, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    /// Message attached to a field, if any
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field.as_str(), e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least two characters, letters and spaces only
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    name.chars().count() >= MIN_NAME_LENGTH && NAME_RE.is_match(name)
}

pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    password == confirmation
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    None = 0,
    Weak = 1,
    Fair = 2,
    Good = 3,
    Strong = 4,
}

impl StrengthLevel {
    fn from_score(score: u8) -> Self {
        match score.min(4) {
            0 => StrengthLevel::None,
            1 => StrengthLevel::Weak,
            2 => StrengthLevel::Fair,
            3 => StrengthLevel::Good,
            _ => StrengthLevel::Strong,
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthLevel::None => "None",
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Fair => "Fair",
            StrengthLevel::Good => "Good",
            StrengthLevel::Strong => "Strong",
        }
    }

    /// Meter caption under the password field
    pub fn hint(&self) -> &'static str {
        match self {
            StrengthLevel::None => "Password strength",
            StrengthLevel::Weak => "Weak password",
            StrengthLevel::Fair => "Fair password",
            StrengthLevel::Good => "Good password",
            StrengthLevel::Strong => "Strong password",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordChecks {
    pub length: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl PasswordChecks {
    pub const MAX_SCORE: u8 = 5;

    pub fn evaluate(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            symbol: password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }

    pub fn score(&self) -> u8 {
        [
            self.length,
            self.lowercase,
            self.uppercase,
            self.digit,
            self.symbol,
        ]
        .iter()
        .filter(|passed| **passed)
        .count() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0..=5, one point per passed check
    pub score: u8,
    pub level: StrengthLevel,
    pub checks: PasswordChecks,
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = PasswordChecks::evaluate(password);
    let score = checks.score();
    PasswordStrength {
        score,
        level: StrengthLevel::from_score(score),
        checks,
    }
}

/// Input kinds that get live feedback while typing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Email,
    Password,
    Text { required: bool },
}

/// Live per-field check. Empty fields are not flagged here; the submit-time
/// validators handle required fields.
pub fn check_field(kind: InputKind, value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return None;
    }
    match kind {
        InputKind::Email if !is_valid_email(value) => Some("Please enter a valid email address"),
        InputKind::Password if value.chars().count() < MIN_PASSWORD_LENGTH => {
            Some("Password must be at least 8 characters long")
        }
        InputKind::Text { required: true } if value.trim().chars().count() < MIN_NAME_LENGTH => {
            Some("This field must be at least 2 characters long")
        }
        _ => None,
    }
}

/// Live check for the confirmation field; an empty confirmation is not flagged
pub fn check_confirmation(password: &str, confirmation: &str) -> Option<&'static str> {
    if !confirmation.is_empty() && !passwords_match(password, confirmation) {
        Some("Passwords do not match")
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.email.is_empty() {
            errors.push(Field::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.push(Field::Email, "Please enter a valid email");
        }

        if self.password.is_empty() {
            errors.push(Field::Password, "Password is required");
        }

        errors.into_result()
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            remember_me: self.remember_me,
        }
    }
}

/// Ordered toggle-set of cuisines picked on the signup form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CuisineSelection(Vec<String>);

impl CuisineSelection {
    /// Add when absent, remove when present. Returns whether it is now selected.
    pub fn toggle(&mut self, cuisine: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|c| c == cuisine) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(cuisine.to_string());
            true
        }
    }

    pub fn contains(&self, cuisine: &str) -> bool {
        self.0.iter().any(|c| c == cuisine)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Comma-joined value for the hidden form input
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub cuisines: CuisineSelection,
    pub agree_terms: bool,
    pub newsletter: bool,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.first_name.trim().is_empty() {
            errors.push(Field::FirstName, "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.push(Field::LastName, "Last name is required");
        }

        if self.email.is_empty() {
            errors.push(Field::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.push(Field::Email, "Please enter a valid email");
        }

        if self.password.is_empty() {
            errors.push(Field::Password, "Password is required");
        } else if password_strength(&self.password).level < StrengthLevel::Fair {
            errors.push(Field::Password, "Password is too weak");
        }

        if !passwords_match(&self.password, &self.confirm_password) {
            errors.push(Field::ConfirmPassword, "Passwords do not match");
        }

        if !self.agree_terms {
            errors.push(Field::Terms, "You must agree to the terms");
        }

        errors.into_result()
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            cuisine_preferences: self.cuisines.as_slice().to_vec(),
            agree_terms: self.agree_terms,
            newsletter: self.newsletter,
        }
    }
}
