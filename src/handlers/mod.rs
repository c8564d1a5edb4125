pub mod analytics;
pub mod redirect;
pub mod shorten;

use askama::Template;

/// Password-entry form served in place of a redirect or analytics page when
/// a protected link is requested without a (valid) password. `action` is the
/// validate endpoint the form posts to; `error` is empty unless a previous
/// attempt failed.
#[derive(Template)]
#[template(path = "password_prompt.html")]
pub struct PasswordPromptTemplate {
    pub action: String,
    pub error: String,
}

impl PasswordPromptTemplate {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            error: String::new(),
        }
    }

    pub fn with_error(action: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            error: error.into(),
        }
    }
}
