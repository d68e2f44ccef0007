//! Input validation utilities for blog service

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BlogError, FieldError};

/// Minimum length (in characters) for passwords, post titles and post content
pub const MIN_TEXT_LEN: usize = 5;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Non-empty and at least `min` characters long (counted as chars, not bytes)
pub fn validate_min_length(value: &str, min: usize) -> bool {
    !value.is_empty() && value.chars().count() >= min
}

/// Collects failed rules so a request reports all of them at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.0.push(FieldError::new(message));
        }
        self
    }

    pub fn into_result(self) -> Result<(), BlogError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(BlogError::Validation(self.0))
        }
    }
}

/// Rules for `createUser`
pub fn validate_user_input(email: &str, password: &str) -> Result<(), BlogError> {
    let mut violations = Violations::new();
    violations
        .check(validate_email(email), "E-Mail is invalid")
        .check(
            validate_min_length(password, MIN_TEXT_LEN),
            "Password must be at least 5 characters long",
        );
    violations.into_result()
}

/// Rules for `createPost` and `updatePost`
pub fn validate_post_input(title: &str, content: &str) -> Result<(), BlogError> {
    let mut violations = Violations::new();
    violations
        .check(
            validate_min_length(title, MIN_TEXT_LEN),
            "Title must be at least 5 characters long",
        )
        .check(
            validate_min_length(content, MIN_TEXT_LEN),
            "Content must be at least 5 characters long",
        );
    violations.into_result()
}
