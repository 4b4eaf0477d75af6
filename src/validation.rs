//! Validation helpers for the todo MCP server
//!
//! Parsers for the string inputs tools receive (dates, sort keys), turning
//! failures into invalid-params errors that name the accepted values.

use chrono::NaiveDate;
use mcp_attr::Result as McpResult;

use crate::tasks::SortKey;

/// Parse a `YYYY-MM-DD` date parameter.
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
        mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(
            format!(
                "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2024-05-01')",
                date_str
            ),
            true,
        )
    })
}

/// Parse a sort key parameter.
pub fn parse_sort_key(key_str: &str) -> McpResult<SortKey> {
    key_str.parse::<SortKey>().map_err(|_| {
        mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(
            format!(
                "Invalid sort key '{}'. Valid options are: date, name, done",
                key_str
            ),
            true,
        )
    })
}
