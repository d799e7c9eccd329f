/// Maximum number of characters allowed in a task title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum number of characters allowed in a task description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

const TITLE_REQUIRED: &str = "Task title is required";
const TITLE_TOO_LONG: &str = "Task title must be 255 characters or less";
const DESCRIPTION_TOO_LONG: &str = "Task description must be 1000 characters or less";

/// Error type for task field validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The title is blank or longer than [`MAX_TITLE_LENGTH`].
    #[error("{0}")]
    InvalidTitle(&'static str),
    /// The description is longer than [`MAX_DESCRIPTION_LENGTH`].
    #[error("{0}")]
    InvalidDescription(&'static str),
}

/// Checks that a title is present and not longer than [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::InvalidTitle(TITLE_REQUIRED));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::InvalidTitle(TITLE_TOO_LONG));
    }
    Ok(())
}

/// Checks that a description is not longer than [`MAX_DESCRIPTION_LENGTH`] characters.
/// A missing description is always valid.
pub fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LENGTH => {
            Err(ValidationError::InvalidDescription(DESCRIPTION_TOO_LONG))
        }
        _ => Ok(()),
    }
}
