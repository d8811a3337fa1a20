use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for the resume endpoint.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ResumeQuery {
    /// Continuation token from the previous page; empty or absent for the first page
    #[validate(length(max = 512, message = "Token is too long"))]
    pub token: Option<String>,
}

impl ResumeQuery {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}
