//! Path parameter helpers

use ember_core::Snowflake;

use crate::response::ApiError;

/// Parse a path segment as a Snowflake ID
pub fn parse_snowflake(value: &str, name: &str) -> Result<Snowflake, ApiError> {
    value
        .parse::<Snowflake>()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snowflake() {
        assert_eq!(parse_snowflake("42", "user_id").unwrap(), Snowflake::new(42));
        assert!(parse_snowflake("forty-two", "user_id").is_err());
    }
}
