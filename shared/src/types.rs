//! Common wire types

use serde::{Deserialize, Serialize};

/// Uniform success envelope: `{ "data": ..., "error": null }`.
///
/// Failures use the same shape with `data` set to null, so callers can
/// always test `data` to detect an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_carries_null_error() {
        let body = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(body, serde_json::json!({"data": 3, "error": null}));
    }
}
