//! Input validation for the setup and module forms.
//!
//! Pure predicate functions with no side effects. Each check returns a
//! [`ValidationError`] carrying a message suitable for displaying to the
//! user verbatim.

use regex::Regex;
use thiserror::Error;

/// Errors from validating user-entered form fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    Empty(String),

    #[error("{0}")]
    InvalidFormat(String),
}

/// Validator for setup-form input.
///
/// Regex patterns are compiled once at construction:
///
/// - `module_code`: 2-4 leading letters, an optional hyphen, 3-4 trailing
///   digits, case-insensitive. Matches "SE2052", "CSC1234", "CS-2052",
///   "COMP101".
/// - `student_id`: alphanumeric, at least 5 characters. Kept permissive so
///   institution formats other than the default one still pass.
pub struct Validator {
    module_code: Regex,
    student_id: Regex,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            module_code: Regex::new(r"^[A-Za-z]{2,4}-?[0-9]{3,4}$")
                .expect("Invalid module code regex"),
            student_id: Regex::new(r"^[A-Za-z0-9]{5,}$").expect("Invalid student ID regex"),
        }
    }

    /// Check a module code against the accepted pattern.
    pub fn validate_module_code(&self, code: &str) -> Result<(), ValidationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::Empty(
                "Module code cannot be empty".to_string(),
            ));
        }

        if !self.module_code.is_match(code) {
            return Err(ValidationError::InvalidFormat(
                "Module code should be 2-4 letters followed by 3-4 digits (e.g. SE2052 or CS-2052)"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Check a student ID. Spaces inside the ID are ignored.
    pub fn validate_student_id(&self, id: &str) -> Result<(), ValidationError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::Empty(
                "Student ID cannot be empty".to_string(),
            ));
        }

        let compact: String = id.chars().filter(|c| !c.is_whitespace()).collect();
        if !self.student_id.is_match(&compact) {
            return Err(ValidationError::InvalidFormat(
                "Student ID should be at least 5 letters and digits".to_string(),
            ));
        }

        Ok(())
    }

    /// Check a student name: non-empty and more than one character.
    pub fn validate_name(&self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("Name cannot be empty".to_string()));
        }

        if name.len() < 2 {
            return Err(ValidationError::InvalidFormat(
                "Name is too short".to_string(),
            ));
        }

        Ok(())
    }

    /// Check a module name: non-empty and at least 3 characters.
    pub fn validate_module_name(&self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty(
                "Module name cannot be empty".to_string(),
            ));
        }

        if name.len() < 3 {
            return Err(ValidationError::InvalidFormat(
                "Module name is too short".to_string(),
            ));
        }

        Ok(())
    }

    /// Check a sheet number is within the printable range.
    pub fn validate_sheet_number(&self, number: u32) -> Result<(), ValidationError> {
        if !(1..=99).contains(&number) {
            return Err(ValidationError::InvalidFormat(
                "Sheet number should be between 1 and 99".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
