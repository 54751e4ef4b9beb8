/// A request field that failed its length rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Require at least `min` characters after trimming.
pub fn min_len(
    field: &'static str,
    value: &str,
    min: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().chars().count() < min {
        return Err(ValidationError { field, message });
    }
    Ok(())
}
