//! Pagination extractors
//!
//! Offset/limit pagination for list endpoints and a before-cursor for the
//! message history endpoint.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use ember_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

/// Default page size
const DEFAULT_LIMIT: usize = 20;
/// Maximum page size for list endpoints
const MAX_LIMIT: usize = 50;
/// Default and maximum page sizes for message history
const DEFAULT_MESSAGE_LIMIT: i64 = 50;
const MAX_MESSAGE_LIMIT: i64 = 100;

/// Raw offset/limit query parameters
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Validated offset/limit pagination
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl From<PageParams> for Page {
    fn from(params: PageParams) -> Self {
        Self {
            limit: params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: params.offset.unwrap_or(0),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(Page::from(params))
    }
}

/// Raw cursor query parameters for message history
#[derive(Debug, Deserialize)]
pub struct CursorParams {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub before: Option<String>,
}

/// Validated before-cursor pagination
#[derive(Debug, Clone, Copy)]
pub struct MessageCursor {
    pub limit: i64,
    /// Exclusive upper bound: the ID of the oldest message already loaded
    pub before: Option<Snowflake>,
}

impl TryFrom<CursorParams> for MessageCursor {
    type Error = ApiError;

    fn try_from(params: CursorParams) -> Result<Self, Self::Error> {
        let before = params
            .before
            .map(|s| {
                s.parse::<Snowflake>()
                    .map_err(|_| ApiError::invalid_query("Invalid 'before' cursor format"))
            })
            .transpose()?;

        Ok(Self {
            limit: params
                .limit
                .unwrap_or(DEFAULT_MESSAGE_LIMIT)
                .clamp(1, MAX_MESSAGE_LIMIT),
            before,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MessageCursor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<CursorParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        MessageCursor::try_from(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::default();
        assert_eq!(page.limit, DEFAULT_LIMIT);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_page_clamps_limit() {
        let page = Page::from(PageParams {
            limit: Some(500),
            offset: Some(10),
        });
        assert_eq!(page.limit, MAX_LIMIT);
        assert_eq!(page.offset, 10);

        let page = Page::from(PageParams {
            limit: Some(0),
            offset: None,
        });
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn test_cursor_parses_before() {
        let cursor = MessageCursor::try_from(CursorParams {
            limit: Some(25),
            before: Some("123456".to_string()),
        })
        .unwrap();
        assert_eq!(cursor.limit, 25);
        assert_eq!(cursor.before, Some(Snowflake::new(123456)));
    }

    #[test]
    fn test_cursor_rejects_bad_before() {
        let result = MessageCursor::try_from(CursorParams {
            limit: None,
            before: Some("not-a-snowflake".to_string()),
        });
        assert!(result.is_err());
    }
}
