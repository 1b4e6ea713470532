//! Error-node contract and projector input model
//!
//! `ErrorNode` is the shape of the error objects the projector reads. Every
//! field is optional: structural presence (`Option::is_some`) is what decides
//! whether a mapped field is emitted or falls back to its documented default,
//! so absence must stay distinguishable from an empty value.
//!
//! `ErrorInput` is the sum type over everything a caller may hand to the
//! projector. Normalizing it into a canonical `ErrorNode` happens once, up
//! front, keeping the projection logic itself free of type tests.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message emitted when a node carries no usable message
pub const DEFAULT_MESSAGE: &str = "There was an error.";

/// Name emitted when a node carries no name
pub const DEFAULT_NAME: &str = "UnknownError";

/// Status code emitted when a node carries no status code
pub const DEFAULT_STATUS_CODE: u16 = 500;

/// Placeholder message for function-like input
pub(crate) const FUNCTION_MARKER: &str = "[function]";

/// Placeholder message for a list whose primary element is itself a list
pub(crate) const NESTED_LIST_MARKER: &str = "[array of arrays]";

/// An error object with up to three kinds of related sub-errors
///
/// - `from` — the direct cause, forming a chain
/// - `errors` — independent co-occurring errors (e.g., batch failures)
/// - `fields` — errors attributed to named inputs (e.g., per form field)
///
/// The projector only reads this contract; construction and mutation belong
/// to the error-factory system behind [`ErrorRegistry`](crate::ErrorRegistry).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorNode {
    /// Coercion tag set when a non-error value was wrapped into a node
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Error type identifier (e.g., "NotifyUser")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Developer-facing description; arbitrary JSON when the node wraps a
    /// non-error value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,

    /// Message safe for external exposure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_safe_message: Option<String>,

    /// Suggested protocol status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Input name this error is attributed to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Captured stack text; never read by the projector, which renders the
    /// `stack` output field through the registry collaborator instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    /// Direct cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Box<ErrorNode>>,

    /// Aggregated co-occurring errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorNode>>,

    /// Errors keyed by input name, in insertion order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, ErrorNode>>,
}

impl ErrorNode {
    /// Create a named error with a developer-facing message
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(Value::String(message.into())),
            ..Self::default()
        }
    }

    /// Set the client-safe message
    pub fn with_client_safe_message(mut self, message: impl Into<String>) -> Self {
        self.client_safe_message = Some(message.into());
        self
    }

    /// Set the suggested status code
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Set the captured stack text
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Set the direct cause
    pub fn with_from(mut self, from: ErrorNode) -> Self {
        self.from = Some(Box::new(from));
        self
    }

    /// Append an aggregated error
    pub fn with_error(mut self, error: ErrorNode) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(error);
        self
    }

    /// Attach an error under a named input
    pub fn with_field(mut self, key: impl Into<String>, error: ErrorNode) -> Self {
        self.fields
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), error);
        self
    }

    /// Leniently extract an `ErrorNode` from arbitrary JSON
    ///
    /// Recognized keys are pulled out when their value has a usable type;
    /// mismatched or unknown keys are ignored rather than rejected. Non-object
    /// input is wrapped the same way the projector wraps scalar input.
    pub fn from_value(value: &Value) -> Self {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return Self::wrap_value(value.clone()),
        };

        let mut node = Self {
            kind: obj.get("type").and_then(Value::as_str).map(String::from),
            name: obj.get("name").and_then(Value::as_str).map(String::from),
            message: obj.get("message").cloned(),
            client_safe_message: obj
                .get("client_safe_message")
                .and_then(Value::as_str)
                .map(String::from),
            status_code: obj
                .get("status_code")
                .and_then(Value::as_u64)
                .and_then(|code| u16::try_from(code).ok()),
            field: obj.get("field").and_then(Value::as_str).map(String::from),
            stack: obj.get("stack").and_then(Value::as_str).map(String::from),
            ..Self::default()
        };

        if let Some(from) = obj.get("from").filter(|v| v.is_object()) {
            node.from = Some(Box::new(Self::from_value(from)));
        }
        if let Some(errors) = obj.get("errors").and_then(Value::as_array) {
            node.errors = Some(errors.iter().map(Self::from_value).collect());
        }
        if let Some(fields) = obj.get("fields").and_then(Value::as_object) {
            node.fields = Some(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::from_value(value)))
                    .collect(),
            );
        }

        node
    }

    /// Wrap a non-error value into the canonical unknown-error shape
    ///
    /// Scalar wraps are tagged through `type`; nested-list wraps (see
    /// [`ErrorNode::nested_list_marker`]) are tagged through `name`.
    pub(crate) fn wrap_value(value: Value) -> Self {
        Self {
            kind: Some(DEFAULT_NAME.to_string()),
            message: Some(value),
            ..Self::default()
        }
    }

    /// Canonical node standing in for a list-of-lists primary element
    pub(crate) fn nested_list_marker() -> Self {
        Self {
            name: Some(DEFAULT_NAME.to_string()),
            message: Some(Value::String(NESTED_LIST_MARKER.to_string())),
            ..Self::default()
        }
    }
}

/// Everything a caller may hand to the projector
///
/// The projector accepts any value and never fails; this enum enumerates the
/// shapes that normalization has to handle instead of duck-typing them.
#[derive(Debug, Clone)]
pub enum ErrorInput {
    /// A well-formed (or at least object-shaped) error
    Node(ErrorNode),
    /// An ordered list: element 0 is the primary error, the rest are folded
    /// into it as aggregates
    List(Vec<ErrorInput>),
    /// A bare JSON scalar or null, carried into the wrapped node's message
    Value(Value),
    /// A function-like value; only the `"[function]"` placeholder survives
    Callback,
}

impl From<ErrorNode> for ErrorInput {
    fn from(node: ErrorNode) -> Self {
        Self::Node(node)
    }
}

impl From<Vec<ErrorInput>> for ErrorInput {
    fn from(items: Vec<ErrorInput>) -> Self {
        Self::List(items)
    }
}

impl From<Value> for ErrorInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(_) => Self::Node(ErrorNode::from_value(&value)),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            other => Self::Value(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_extracts_recognized_fields() {
        let node = ErrorNode::from_value(&json!({
            "name": "NotifyUser",
            "message": "internal detail",
            "client_safe_message": "Bad stuff happened...",
            "status_code": 400,
            "field": "email",
            "stack": "NotifyUser: internal detail",
        }));

        assert_eq!(node.name.as_deref(), Some("NotifyUser"));
        assert_eq!(node.message, Some(json!("internal detail")));
        assert_eq!(
            node.client_safe_message.as_deref(),
            Some("Bad stuff happened...")
        );
        assert_eq!(node.status_code, Some(400));
        assert_eq!(node.field.as_deref(), Some("email"));
        assert!(node.from.is_none());
        assert!(node.errors.is_none());
        assert!(node.fields.is_none());
    }

    #[test]
    fn test_from_value_ignores_mismatched_types() {
        let node = ErrorNode::from_value(&json!({
            "name": 42,
            "status_code": "not a number",
            "from": "not an object",
            "errors": {"not": "an array"},
        }));

        assert!(node.name.is_none());
        assert!(node.status_code.is_none());
        assert!(node.from.is_none());
        assert!(node.errors.is_none());
    }

    #[test]
    fn test_from_value_recurses_relations() {
        let node = ErrorNode::from_value(&json!({
            "from": {"message": "cause"},
            "errors": [{"message": "first"}, "bare string"],
            "fields": {"email": {"message": "bad address"}},
        }));

        assert_eq!(node.from.unwrap().message, Some(json!("cause")));

        let errors = node.errors.unwrap();
        assert_eq!(errors[0].message, Some(json!("first")));
        // Non-object entries get the scalar wrap
        assert_eq!(errors[1].kind.as_deref(), Some(DEFAULT_NAME));
        assert_eq!(errors[1].message, Some(json!("bare string")));

        let fields = node.fields.unwrap();
        assert_eq!(fields["email"].message, Some(json!("bad address")));
    }

    #[test]
    fn test_empty_relations_stay_present() {
        let node = ErrorNode::from_value(&json!({"errors": [], "fields": {}}));
        assert_eq!(node.errors, Some(vec![]));
        assert_eq!(node.fields, Some(IndexMap::new()));
    }

    #[test]
    fn test_input_from_value_dispatch() {
        assert!(matches!(
            ErrorInput::from(json!({"message": "hi"})),
            ErrorInput::Node(_)
        ));
        assert!(matches!(ErrorInput::from(json!([1, 2])), ErrorInput::List(_)));
        assert!(matches!(ErrorInput::from(json!("hi")), ErrorInput::Value(_)));
        assert!(matches!(ErrorInput::from(json!(null)), ErrorInput::Value(_)));
    }

    #[test]
    fn test_builder_helpers() {
        let node = ErrorNode::new("TestError", "test error")
            .with_client_safe_message("safe")
            .with_status_code(400)
            .with_from(ErrorNode::new("TestError", "cause"))
            .with_error(ErrorNode::new("TestError", "sibling"))
            .with_field("email", ErrorNode::new("TestError", "bad address"));

        assert_eq!(node.name.as_deref(), Some("TestError"));
        assert_eq!(node.errors.as_ref().unwrap().len(), 1);
        assert_eq!(node.fields.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_serde_skips_absent_fields() {
        let json = serde_json::to_value(ErrorNode::new("TestError", "boom")).unwrap();
        assert_eq!(json, json!({"name": "TestError", "message": "boom"}));
    }
}
