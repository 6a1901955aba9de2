//! Handler request documents
//!
//! Requests are produced as JSON so tests exercise the same deserialization
//! path as the orchestrator.

use crate::arns::{TEST_ACCOUNT_ID, TEST_PARTITION, TEST_REGION};
use serde_json::{Value, json};

/// Generate a unique client request token.
///
/// Format: `token-{counter}`. Unique within one test process, which is all
/// name generation needs.
pub fn test_request_token() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("token-{counter:08}")
}

/// Build a handler request for `desired` with no previous state.
///
/// # Example
///
/// ```
/// use eventbridge_cfn_test_utils::requests::handler_request;
/// use serde_json::json;
///
/// let request = handler_request(json!({"Name": "r"}));
/// assert_eq!(request["desiredResourceState"]["Name"], "r");
/// ```
pub fn handler_request(desired: Value) -> Value {
    json!({
        "awsAccountId": TEST_ACCOUNT_ID,
        "awsPartition": TEST_PARTITION,
        "region": TEST_REGION,
        "logicalResourceIdentifier": "MyResource",
        "clientRequestToken": test_request_token(),
        "desiredResourceState": desired,
    })
}

/// Build an update request carrying both desired and previous state
pub fn update_request(desired: Value, previous: Value) -> Value {
    let mut request = handler_request(desired);
    request["previousResourceState"] = previous;
    request
}

/// Build a list request for one page
pub fn list_request(desired: Value, next_token: Option<&str>) -> Value {
    let mut request = handler_request(desired);
    if let Some(token) = next_token {
        request["nextToken"] = Value::String(token.to_string());
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        assert_ne!(test_request_token(), test_request_token());
    }

    #[test]
    fn update_request_has_both_states() {
        let request = update_request(json!({"Name": "a"}), json!({"Name": "b"}));
        assert_eq!(request["desiredResourceState"]["Name"], "a");
        assert_eq!(request["previousResourceState"]["Name"], "b");
        assert_eq!(request["awsAccountId"], TEST_ACCOUNT_ID);
    }

    #[test]
    fn list_request_carries_token() {
        let request = list_request(json!({}), Some("next"));
        assert_eq!(request["nextToken"], "next");
        assert!(list_request(json!({}), None).get("nextToken").is_none());
    }
}
