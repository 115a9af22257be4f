//! ESC telemetry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EscError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid start marker: expected 0x9B, got 0x{0:02X}")]
    InvalidMarker(u8),

    #[error("Short read: expected {expected} bytes, got {received}")]
    ShortRead { expected: usize, received: usize },

    #[error("Read timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type EscResult<T> = Result<T, EscError>;

impl EscError {
    /// True when the transport gave up waiting for bytes.
    ///
    /// Callers treat this as "no frame obtained this call" and may retry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, EscError::Timeout(_) | EscError::ShortRead { .. })
    }
}

impl From<std::io::Error> for EscError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::UnexpectedEof => {
                EscError::Timeout(e.to_string())
            }
            _ => EscError::Transport(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EscError::InvalidLength {
            expected: 24,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Invalid frame length: expected 24, got 3");

        let err = EscError::InvalidMarker(0x1F);
        assert_eq!(err.to_string(), "Invalid start marker: expected 0x9B, got 0x1F");
    }

    #[test]
    fn test_error_from_io_timeout() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "operation timed out");
        let esc_err: EscError = io_err.into();
        assert!(matches!(esc_err, EscError::Timeout(_)));
        assert!(esc_err.is_timeout());
    }

    #[test]
    fn test_error_from_io_other() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "device unplugged");
        let esc_err: EscError = io_err.into();
        assert!(matches!(esc_err, EscError::Transport(_)));
        assert!(!esc_err.is_timeout());
    }
}
