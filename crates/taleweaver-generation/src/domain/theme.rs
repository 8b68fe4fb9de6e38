//! Generation themes.

use std::fmt;

use super::error::GenerationError;

/// A validated, non-blank generation theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme(String);

impl Theme {
    /// Validates and trims a raw theme.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyTheme` if `raw` is blank.
    pub fn new(raw: &str) -> Result<Self, GenerationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GenerationError::EmptyTheme);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The theme text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
