//! Error-factory collaborator seam
//!
//! The projector does not construct errors; it consumes two operations from
//! whatever factory/registry owns the error model. `ErrorRegistry` is that
//! seam, and `BasicRegistry` is a minimal implementation so the crate works
//! standalone (tests, examples, services without a full factory).

use crate::types::{ErrorNode, DEFAULT_MESSAGE, DEFAULT_NAME};
use serde_json::Value;

/// Operations the projector consumes from the error-factory system
pub trait ErrorRegistry: Send + Sync {
    /// Fold an additional error into the primary as an aggregate
    ///
    /// Used only while normalizing list input: element 0 is the primary and
    /// every later element is attached through this operation, in order.
    fn attach_aggregate(&self, primary: ErrorNode, additional: ErrorNode) -> ErrorNode;

    /// Render the stack text for a node
    ///
    /// When `include_from` is true the rendering follows the cause chain.
    /// The projector always asks for the single-node form.
    fn render_stack(&self, node: &ErrorNode, include_from: bool) -> String;
}

/// Minimal registry for standalone use
///
/// Aggregation appends the additional node and hoists its own aggregate list
/// after it. Richer merge semantics (keyed-field flattening, deduplication)
/// belong to a full factory implementation behind the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRegistry;

impl BasicRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self
    }
}

impl ErrorRegistry for BasicRegistry {
    fn attach_aggregate(&self, mut primary: ErrorNode, mut additional: ErrorNode) -> ErrorNode {
        let hoisted = additional.errors.take().unwrap_or_default();
        let errors = primary.errors.get_or_insert_with(Vec::new);
        errors.push(additional);
        errors.extend(hoisted);
        primary
    }

    fn render_stack(&self, node: &ErrorNode, include_from: bool) -> String {
        let mut rendered = match &node.stack {
            Some(stack) => stack.trim().to_string(),
            None => {
                let name = node.name.as_deref().unwrap_or(DEFAULT_NAME);
                let message = match &node.message {
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                    None => DEFAULT_MESSAGE.to_string(),
                };
                format!("{}: {}", name, message)
            }
        };

        if include_from {
            let mut cause = node.from.as_deref();
            while let Some(node) = cause {
                rendered.push_str("\n    from: ");
                rendered.push_str(&self.render_stack(node, false));
                cause = node.from.as_deref();
            }
        }

        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> BasicRegistry {
        BasicRegistry::new()
    }

    #[test]
    fn test_attach_creates_aggregate_list() {
        let reg = test_registry();
        let primary = ErrorNode::new("TestError", "primary");
        let result = reg.attach_aggregate(primary, ErrorNode::new("TestError", "second"));

        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, Some("second".into()));
    }

    #[test]
    fn test_attach_hoists_nested_aggregates() {
        let reg = test_registry();
        let primary = ErrorNode::new("TestError", "primary");
        let additional = ErrorNode::new("TestError", "second")
            .with_error(ErrorNode::new("TestError", "third"));

        let result = reg.attach_aggregate(primary, additional);
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, Some("second".into()));
        assert!(errors[0].errors.is_none());
        assert_eq!(errors[1].message, Some("third".into()));
    }

    #[test]
    fn test_render_prefers_captured_stack() {
        let reg = test_registry();
        let node = ErrorNode::new("TestError", "boom").with_stack("  captured trace  ");
        assert_eq!(reg.render_stack(&node, false), "captured trace");
    }

    #[test]
    fn test_render_synthesizes_from_name_and_message() {
        let reg = test_registry();
        let node = ErrorNode::new("TestError", "boom");
        assert_eq!(reg.render_stack(&node, false), "TestError: boom");

        assert_eq!(
            reg.render_stack(&ErrorNode::default(), false),
            format!("{}: {}", DEFAULT_NAME, DEFAULT_MESSAGE)
        );
    }

    #[test]
    fn test_render_follows_cause_chain() {
        let reg = test_registry();
        let node = ErrorNode::new("TestError", "outer")
            .with_from(ErrorNode::new("TestError", "middle").with_from(ErrorNode::new(
                "TestError",
                "inner",
            )));

        assert_eq!(
            reg.render_stack(&node, true),
            "TestError: outer\n    from: TestError: middle\n    from: TestError: inner"
        );
        assert_eq!(reg.render_stack(&node, false), "TestError: outer");
    }
}
