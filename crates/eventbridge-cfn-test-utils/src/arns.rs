//! Account ids and ARN builders
//!
//! ARNs are built the way EventBridge reports them, so tests can compare
//! resolver output against literal service responses.

/// Account the handler runs as
pub const TEST_ACCOUNT_ID: &str = "123456789012";

/// A second account, for cross-account event buses
pub const OTHER_ACCOUNT_ID: &str = "210987654321";

/// Region used by every fixture
pub const TEST_REGION: &str = "us-east-1";

/// Partition used by every fixture
pub const TEST_PARTITION: &str = "aws";

/// Build a rule ARN. `None` (or `default`) means the default event bus,
/// which EventBridge omits from the ARN.
///
/// # Example
///
/// ```
/// use eventbridge_cfn_test_utils::arns::rule_arn;
///
/// assert_eq!(
///     rule_arn("123456789012", Some("orders"), "on-order"),
///     "arn:aws:events:us-east-1:123456789012:rule/orders/on-order"
/// );
/// ```
pub fn rule_arn(account: &str, event_bus: Option<&str>, name: &str) -> String {
    match event_bus {
        Some(bus) if bus != "default" => {
            format!("arn:{TEST_PARTITION}:events:{TEST_REGION}:{account}:rule/{bus}/{name}")
        }
        _ => format!("arn:{TEST_PARTITION}:events:{TEST_REGION}:{account}:rule/{name}"),
    }
}

/// Build an event bus ARN.
///
/// # Example
///
/// ```
/// use eventbridge_cfn_test_utils::arns::event_bus_arn;
///
/// assert!(event_bus_arn("210987654321", "shared").ends_with(":event-bus/shared"));
/// ```
pub fn event_bus_arn(account: &str, event_bus: &str) -> String {
    format!("arn:{TEST_PARTITION}:events:{TEST_REGION}:{account}:event-bus/{event_bus}")
}

/// Build a connection ARN with a fixed resource suffix
pub fn connection_arn(name: &str) -> String {
    format!(
        "arn:{TEST_PARTITION}:events:{TEST_REGION}:{TEST_ACCOUNT_ID}:connection/{name}/0b7a4f3c-5d5e-4c57-9e0b-2f0c5c4a1e11"
    )
}

/// Build an API destination ARN with a fixed resource suffix
pub fn api_destination_arn(name: &str) -> String {
    format!(
        "arn:{TEST_PARTITION}:events:{TEST_REGION}:{TEST_ACCOUNT_ID}:api-destination/{name}/6c2f0b8e-93f4-4a76-8b0e-5b1d2a7c9d40"
    )
}
