//! WebSocket close codes
//!
//! Application-specific close codes sent when terminating a connection.

use serde::{Deserialize, Serialize};

/// Realtime WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Invalid or missing access token
    Unauthorized = 4001,
    /// Frame could not be decoded
    DecodeError = 4002,
    /// A newer connection for the same user replaced this one
    Superseded = 4003,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4000 => Some(Self::UnknownError),
            4001 => Some(Self::Unauthorized),
            4002 => Some(Self::DecodeError),
            4003 => Some(Self::Superseded),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::Unauthorized => "Unauthorized",
            Self::DecodeError => "Invalid frame encoding",
            Self::Superseded => "Connection superseded by a newer one",
        }
    }

    /// Whether the client should attempt to reconnect after this close code
    #[must_use]
    pub const fn should_reconnect(self) -> bool {
        matches!(self, Self::UnknownError | Self::DecodeError)
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u16())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_code_values() {
        assert_eq!(CloseCode::UnknownError.as_u16(), 4000);
        assert_eq!(CloseCode::Unauthorized.as_u16(), 4001);
        assert_eq!(CloseCode::DecodeError.as_u16(), 4002);
        assert_eq!(CloseCode::Superseded.as_u16(), 4003);
    }

    #[test]
    fn test_close_code_from_u16() {
        assert_eq!(CloseCode::from_u16(4001), Some(CloseCode::Unauthorized));
        assert_eq!(CloseCode::from_u16(1000), None);
    }

    #[test]
    fn test_should_reconnect() {
        assert!(CloseCode::UnknownError.should_reconnect());
        assert!(CloseCode::DecodeError.should_reconnect());
        assert!(!CloseCode::Unauthorized.should_reconnect());
        assert!(!CloseCode::Superseded.should_reconnect());
    }
}
