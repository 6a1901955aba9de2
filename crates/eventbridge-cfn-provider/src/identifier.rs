//! Rule identifiers
//!
//! A rule's name is only unique within its event bus, so the physical id is a
//! composite of the two:
//!
//! | Event bus | Identifier |
//! |-----------|------------|
//! | `default` | `my-rule` |
//! | `orders` (same account) | `orders\|my-rule` |
//! | `orders` in another account | `arn:aws:events:us-east-1:210987654321:event-bus/orders\|my-rule` |
//!
//! Cross-account buses keep their full ARN so the id never collides with a
//! same-named bus in the caller's account.

use eventbridge_cfn_common::defaults::MAX_GENERATED_NAME_LENGTH;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use uuid::Uuid;

/// Name of the event bus every account has
pub const DEFAULT_EVENT_BUS: &str = "default";

/// Separates event bus and rule name in a composite identifier
pub const SEPARATOR: char = '|';

const GENERATED_SUFFIX_LENGTH: usize = 12;

/// `rule/<bus>/<name>`; must be tried before [`RULE_ARN`]
static RULE_ARN_WITH_BUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^arn:(?P<partition>[^:]+):events:(?P<region>[^:]+):(?P<account>\d{12}):rule/(?P<bus>[^/|]+)/(?P<name>[^/|]+)$",
    )
    .expect("rule ARN pattern is valid")
});

/// `rule/<name>` on the default bus
static RULE_ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^arn:(?P<partition>[^:]+):events:(?P<region>[^:]+):(?P<account>\d{12}):rule/(?P<name>[^/|]+)$",
    )
    .expect("rule ARN pattern is valid")
});

static EVENT_BUS_ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^arn:(?P<partition>[^:]+):events:(?P<region>[^:]+):(?P<account>\d{12}):event-bus/(?P<bus>[^/|]+)$",
    )
    .expect("event bus ARN pattern is valid")
});

/// A rule's name and the event bus it lives on.
///
/// `event_bus` is a bus name for the caller's account, or a full event bus
/// ARN for another account. Either form is accepted by the EventBridge API as
/// `EventBusName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleIdentifier {
    pub name: String,
    pub event_bus: String,
}

impl RuleIdentifier {
    pub fn is_default_bus(&self) -> bool {
        self.event_bus == DEFAULT_EVENT_BUS
    }
}

/// Parts of an event bus ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBusArn<'a> {
    pub partition: &'a str,
    pub region: &'a str,
    pub account: &'a str,
    pub name: &'a str,
}

impl<'a> EventBusArn<'a> {
    pub fn parse(arn: &'a str) -> Option<Self> {
        let caps = EVENT_BUS_ARN.captures(arn)?;
        Some(Self {
            partition: group(&caps, "partition")?,
            region: group(&caps, "region")?,
            account: group(&caps, "account")?,
            name: group(&caps, "bus")?,
        })
    }
}

fn group<'h>(caps: &Captures<'h>, name: &str) -> Option<&'h str> {
    caps.name(name).map(|m| m.as_str())
}

/// Resolves identifiers relative to the calling account
#[derive(Debug, Clone, Copy)]
pub struct IdentifierResolver<'a> {
    account: &'a str,
    partition: &'a str,
    region: &'a str,
}

impl<'a> IdentifierResolver<'a> {
    pub fn new(account: &'a str, partition: &'a str, region: &'a str) -> Self {
        Self {
            account,
            partition,
            region,
        }
    }

    /// Work out a rule's name and event bus.
    ///
    /// Explicit `name` and `event_bus` win. Gaps are filled from `opaque`,
    /// which may be a rule ARN, a composite identifier or a bare name. With
    /// nothing to go on the result is the default bus and an empty name.
    pub fn resolve(
        &self,
        name: Option<&str>,
        event_bus: Option<&str>,
        opaque: Option<&str>,
    ) -> RuleIdentifier {
        let parsed = opaque.map(|value| self.parse_opaque(value));
        let (parsed_bus, parsed_name) = match &parsed {
            Some((bus, name)) => (Some(bus.as_str()), Some(name.as_str())),
            None => (None, None),
        };

        RuleIdentifier {
            name: name.or(parsed_name).unwrap_or_default().to_string(),
            event_bus: self.normalize_bus(event_bus.or(parsed_bus).unwrap_or(DEFAULT_EVENT_BUS)),
        }
    }

    /// Returns `(event_bus, name)`
    fn parse_opaque(&self, value: &str) -> (String, String) {
        if let Some(caps) = RULE_ARN_WITH_BUS.captures(value) {
            if let (Some(bus), Some(name)) = (group(&caps, "bus"), group(&caps, "name")) {
                return (self.bus_from_rule_arn(&caps, bus), name.to_string());
            }
        }
        if let Some(caps) = RULE_ARN.captures(value) {
            if let Some(name) = group(&caps, "name") {
                return (self.bus_from_rule_arn(&caps, DEFAULT_EVENT_BUS), name.to_string());
            }
        }

        let mut parts = value.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(bus), Some(name), None) => (bus.to_string(), name.to_string()),
            _ => (DEFAULT_EVENT_BUS.to_string(), value.to_string()),
        }
    }

    /// In-account rule ARNs give a bus name; anything else keeps the full bus ARN.
    fn bus_from_rule_arn(&self, caps: &Captures<'_>, bus: &str) -> String {
        match group(caps, "account") {
            Some(account) if account == self.account => bus.to_string(),
            _ => format!(
                "arn:{}:events:{}:{}:event-bus/{bus}",
                group(caps, "partition").unwrap_or(self.partition),
                group(caps, "region").unwrap_or(self.region),
                group(caps, "account").unwrap_or(self.account),
            ),
        }
    }

    /// Event bus ARNs in the caller's account collapse to the bus name
    fn normalize_bus(&self, bus: &str) -> String {
        match EventBusArn::parse(bus) {
            Some(arn) if arn.account == self.account => arn.name.to_string(),
            _ => bus.to_string(),
        }
    }

    /// The composite primary identifier
    pub fn canonical_id(&self, id: &RuleIdentifier) -> String {
        let bus = self.normalize_bus(&id.event_bus);
        if bus == DEFAULT_EVENT_BUS {
            id.name.clone()
        } else {
            format!("{bus}{SEPARATOR}{}", id.name)
        }
    }

    /// The rule ARN. A cross-account bus supplies its own account and region.
    pub fn rule_arn(&self, id: &RuleIdentifier) -> String {
        let (partition, region, account, bus) = match EventBusArn::parse(&id.event_bus) {
            Some(arn) => (arn.partition, arn.region, arn.account, arn.name),
            None => (self.partition, self.region, self.account, id.event_bus.as_str()),
        };
        if bus == DEFAULT_EVENT_BUS {
            format!("arn:{partition}:events:{region}:{account}:rule/{}", id.name)
        } else {
            format!("arn:{partition}:events:{region}:{account}:rule/{bus}/{}", id.name)
        }
    }

    /// ARN of an event bus in the caller's account
    pub fn event_bus_arn(&self, name: &str) -> String {
        format!(
            "arn:{}:events:{}:{}:event-bus/{name}",
            self.partition, self.region, self.account
        )
    }
}

/// Physical name for a resource created without one.
///
/// The suffix is derived from the request token, so every re-invocation of the
/// same create picks the same name. The logical id is truncated to fit
/// `max_length`.
pub fn generate_resource_name(logical_id: &str, request_token: &str, max_length: usize) -> String {
    let suffix: String = Uuid::new_v5(&Uuid::NAMESPACE_OID, request_token.as_bytes())
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(GENERATED_SUFFIX_LENGTH)
        .collect();
    let keep = max_length.saturating_sub(GENERATED_SUFFIX_LENGTH + 1);
    let prefix: String = logical_id.chars().take(keep).collect();
    format!("{prefix}-{suffix}")
}

/// [`generate_resource_name`] with the EventBridge name limit
pub fn generate_name(logical_id: &str, request_token: &str) -> String {
    generate_resource_name(logical_id, request_token, MAX_GENERATED_NAME_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventbridge_cfn_test_utils::{
        OTHER_ACCOUNT_ID, TEST_ACCOUNT_ID, TEST_REGION, event_bus_arn, rule_arn,
    };

    fn resolver() -> IdentifierResolver<'static> {
        IdentifierResolver::new(TEST_ACCOUNT_ID, "aws", TEST_REGION)
    }

    fn id_round_trip(opaque: &str) -> String {
        let resolver = resolver();
        resolver.canonical_id(&resolver.resolve(None, None, Some(opaque)))
    }

    #[test]
    fn explicit_name_on_default_bus_is_the_name() {
        let resolver = resolver();
        for name in ["my-rule", "a", "Rule_With.Dots-123"] {
            let id = resolver.resolve(Some(name), None, None);
            assert!(id.is_default_bus());
            assert_eq!(resolver.canonical_id(&id), name);
        }
    }

    #[test]
    fn composite_identifiers_round_trip() {
        assert_eq!(id_round_trip("my-rule"), "my-rule");
        assert_eq!(id_round_trip("orders|my-rule"), "orders|my-rule");

        let cross = format!("{}|my-rule", event_bus_arn(OTHER_ACCOUNT_ID, "orders"));
        assert_eq!(id_round_trip(&cross), cross);
    }

    #[test]
    fn same_account_rule_arn_round_trips() {
        let resolver = resolver();
        for bus in [None, Some("orders")] {
            let arn = rule_arn(TEST_ACCOUNT_ID, bus, "my-rule");
            let id = resolver.resolve(None, None, Some(&arn));
            assert_eq!(id.name, "my-rule");
            assert_eq!(id.event_bus, bus.unwrap_or(DEFAULT_EVENT_BUS));
            assert_eq!(resolver.rule_arn(&id), arn);
        }
        let id = resolver.resolve(None, None, Some(&rule_arn(TEST_ACCOUNT_ID, Some("orders"), "r")));
        assert_eq!(resolver.canonical_id(&id), "orders|r");
    }

    #[test]
    fn cross_account_rule_arn_keeps_bus_arn() {
        let resolver = resolver();
        let arn = rule_arn(OTHER_ACCOUNT_ID, Some("orders"), "my-rule");
        let id = resolver.resolve(None, None, Some(&arn));

        assert_eq!(id.event_bus, event_bus_arn(OTHER_ACCOUNT_ID, "orders"));
        assert_eq!(resolver.rule_arn(&id), arn);
        assert_eq!(
            resolver.canonical_id(&id),
            format!("{}|my-rule", event_bus_arn(OTHER_ACCOUNT_ID, "orders"))
        );
    }

    #[test]
    fn cross_account_bus_never_short_forms() {
        let resolver = resolver();
        let local = resolver.resolve(Some("r"), Some("orders"), None);
        let remote = resolver.resolve(
            Some("r"),
            Some(&event_bus_arn(OTHER_ACCOUNT_ID, "orders")),
            None,
        );

        assert_eq!(resolver.canonical_id(&local), "orders|r");
        assert_ne!(resolver.canonical_id(&remote), resolver.canonical_id(&local));
        assert!(resolver.canonical_id(&remote).starts_with("arn:aws:events:"));
    }

    #[test]
    fn same_account_bus_arn_collapses_to_name() {
        let resolver = resolver();
        let id = resolver.resolve(Some("r"), Some(&event_bus_arn(TEST_ACCOUNT_ID, "orders")), None);
        assert_eq!(id.event_bus, "orders");
        assert_eq!(resolver.canonical_id(&id), "orders|r");

        let id = resolver.resolve(Some("r"), Some(&event_bus_arn(TEST_ACCOUNT_ID, "default")), None);
        assert_eq!(resolver.canonical_id(&id), "r");
    }

    #[test]
    fn explicit_fields_fill_before_opaque() {
        let resolver = resolver();
        let id = resolver.resolve(None, Some("billing"), Some("orders|my-rule"));
        assert_eq!(id.name, "my-rule");
        assert_eq!(id.event_bus, "billing");
    }

    #[test]
    fn malformed_arn_is_a_plain_name() {
        let resolver = resolver();
        let value = "arn:aws:events:us-east-1:12345:rule/x";
        let id = resolver.resolve(None, None, Some(value));
        assert_eq!(id.name, value);
        assert!(id.is_default_bus());
    }

    #[test]
    fn nothing_resolves_to_empty_name_on_default_bus() {
        let id = resolver().resolve(None, None, None);
        assert_eq!(id.name, "");
        assert!(id.is_default_bus());
    }

    #[test]
    fn generated_names_are_stable_and_bounded() {
        let name = generate_name("MyRule", "token-1");
        assert_eq!(name, generate_name("MyRule", "token-1"));
        assert_ne!(name, generate_name("MyRule", "token-2"));

        let (prefix, suffix) = name.rsplit_once('-').unwrap();
        assert_eq!(prefix, "MyRule");
        assert_eq!(suffix.len(), 12);
        assert!(suffix.chars().all(|c| !c.is_ascii_lowercase()));

        let long = "L".repeat(100);
        let name = generate_name(&long, "token-1");
        assert_eq!(name.len(), MAX_GENERATED_NAME_LENGTH);
    }
}
