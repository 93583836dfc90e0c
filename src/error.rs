use std::fmt;

/// Registration error
///
/// Returned by [`Mux::try_handle`](crate::Mux::try_handle) when a pattern
/// cannot be added to the route tree. These are programmer errors; the
/// panicking [`Mux::handle`](crate::Mux::handle) turns them into a panic at
/// startup. Request traffic never produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The pattern was the empty string
    EmptyPattern,
    /// A route with the same canonical pattern is already registered
    DuplicatePattern {
        /// The canonical form of the rejected pattern
        pattern: String,
    },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::EmptyPattern => write!(f, "mux: invalid pattern \"\""),
            RegisterError::DuplicatePattern { pattern } => {
                write!(f, "mux: multiple registrations for {pattern}")
            }
        }
    }
}

impl std::error::Error for RegisterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            RegisterError::EmptyPattern.to_string(),
            "mux: invalid pattern \"\""
        );
        let dup = RegisterError::DuplicatePattern {
            pattern: "/a/".to_string(),
        };
        assert_eq!(dup.to_string(), "mux: multiple registrations for /a/");
    }
}
