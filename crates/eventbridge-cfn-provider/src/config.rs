//! Configuration for one local invocation

use anyhow::{Context, Result};
use eventbridge_cfn_common::{Action, ResourceKind};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

/// Where a JSON document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means stdin, anything else is a path
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    pub fn read_json(&self) -> Result<Value> {
        let text = match self {
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read stdin")?;
                text
            }
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        };
        serde_json::from_str(&text).with_context(|| format!("{self} is not valid JSON"))
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => f.write_str("stdin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// AWS settings; unset values come from the environment
#[derive(Debug, Clone, Default)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// One handler invocation
#[derive(Debug, Clone)]
pub struct InvokeConfig {
    pub resource: ResourceKind,
    pub action: Action,
    /// Handler request document
    pub request: InputSource,
    /// Callback context from a previous `IN_PROGRESS` event
    pub context: Option<InputSource>,
    pub aws: AwsConfig,
}

impl InvokeConfig {
    /// Read the request and, if given, the callback context
    pub fn load_documents(&self) -> Result<(Value, Option<Value>)> {
        if self.request == InputSource::Stdin && self.context == Some(InputSource::Stdin) {
            anyhow::bail!("Request and callback context cannot both be read from stdin");
        }
        let request = self.request.read_json()?;
        let context = self
            .context
            .as_ref()
            .map(InputSource::read_json)
            .transpose()?;
        Ok((request, context))
    }

    /// Requests from a local file may leave out `region`; fill it from the
    /// region the SDK resolved so ARNs are never built without one.
    pub fn fill_region(request: &mut Value, resolved: Option<&str>) {
        let missing = request["region"].as_str().is_none_or(str::is_empty);
        if let (true, Some(region), Some(fields)) = (missing, resolved, request.as_object_mut()) {
            fields.insert("region".to_string(), Value::String(region.to_string()));
        }
    }

    /// The explicit region, else the one the request was made in
    pub fn region(&self, request: &Value) -> Option<String> {
        self.aws
            .region
            .clone()
            .or_else(|| request["region"].as_str().map(str::to_string))
            .filter(|region| !region.is_empty())
    }
}
