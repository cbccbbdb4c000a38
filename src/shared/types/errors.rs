use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Rejected before the reservation store is touched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The table was taken for that slot by a concurrent booking.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Reservation store unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Unavailable(_))
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::InvalidArgument(_) => "INVALID_ARGUMENT",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(DomainError::Unavailable("db down".into()).is_retryable());
        assert!(!DomainError::Conflict("taken".into()).is_retryable());
        assert!(!DomainError::InvalidArgument("bad date".into()).is_retryable());
        assert!(!DomainError::NotFound {
            entity: "Reservation",
            field: "id",
            value: "7".into(),
        }
        .is_retryable());
    }

    #[test]
    fn conflict_is_distinct_from_unavailable() {
        assert_eq!(DomainError::Conflict("x".into()).code(), "CONFLICT");
        assert_eq!(DomainError::Unavailable("x".into()).code(), "UNAVAILABLE");
    }
}
