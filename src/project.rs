//! The projector: error trees in, plain JSON-safe mappings out
//!
//! Projection runs in three steps. Input normalization turns whatever the
//! caller supplied into one canonical [`ErrorNode`]. Map resolution picks the
//! field map (caller's, or the client-safe default). Per-field projection
//! then walks the map in order, recursing one relation hop at a time with the
//! exclusion policy resolved per hop.
//!
//! There is no failure path: malformed input is normalized, absent fields
//! take documented defaults, and the output is always a plain
//! `serde_json::Map`.

use crate::exclude::{resolve_exclude, ExcludePolicy};
use crate::map::{Field, FieldMap};
use crate::registry::{BasicRegistry, ErrorRegistry};
use crate::types::{
    ErrorInput, ErrorNode, DEFAULT_MESSAGE, DEFAULT_NAME, DEFAULT_STATUS_CODE, FUNCTION_MARKER,
};
use serde_json::{Map, Value};

/// Projects error trees into client-safe JSON objects
///
/// Wraps an [`ErrorRegistry`] collaborator for the two operations the
/// projector does not own: folding list input into aggregates and rendering
/// stack text. Pure and synchronous; safe to share across threads.
pub struct Projector {
    registry: Box<dyn ErrorRegistry>,
}

impl Projector {
    /// Create a projector backed by the given registry
    pub fn new(registry: impl ErrorRegistry + 'static) -> Self {
        Self {
            registry: Box::new(registry),
        }
    }

    /// Project an error-like value into a plain JSON object
    ///
    /// `map` selects which source fields appear and under what output key;
    /// `None` means the privacy-preserving [`FieldMap::client_safe`] default.
    /// `exclude` suppresses fields, recursively scoped per relation; `None`
    /// means no exclusions beyond the per-relation safety defaults.
    ///
    /// Never fails. Any input shape is accepted: lists fold into the primary
    /// element as aggregates, scalars are wrapped into a canonical
    /// unknown-error node. Termination is bounded by the input tree's depth;
    /// the owned-tree node model cannot express cycles.
    pub fn project(
        &self,
        input: impl Into<ErrorInput>,
        map: Option<&FieldMap>,
        exclude: Option<&ExcludePolicy>,
    ) -> Map<String, Value> {
        let node = self.normalize(input.into());

        let default_map;
        let map = match map {
            Some(map) => map,
            None => {
                default_map = FieldMap::client_safe();
                &default_map
            }
        };

        let no_excludes;
        let exclude = match exclude {
            Some(exclude) => exclude,
            None => {
                no_excludes = ExcludePolicy::new();
                &no_excludes
            }
        };

        tracing::trace!(entries = map.len(), "projecting error node");
        self.project_node(&node, map, exclude)
    }

    // ─── Step 1: input normalization ─────────────────────────────────

    fn normalize(&self, input: ErrorInput) -> ErrorNode {
        match input {
            ErrorInput::Node(node) => node,
            ErrorInput::List(items) => self.normalize_list(items),
            ErrorInput::Value(value) => ErrorNode::wrap_value(value),
            ErrorInput::Callback => ErrorNode::wrap_value(FUNCTION_MARKER.into()),
        }
    }

    /// Element 0 is the primary; later elements fold in as aggregates.
    /// A non-node primary keeps nothing but itself: the tail is dropped.
    fn normalize_list(&self, items: Vec<ErrorInput>) -> ErrorNode {
        let mut items = items.into_iter();
        let primary = match items.next() {
            Some(ErrorInput::Node(node)) => node,
            Some(ErrorInput::List(_)) => ErrorNode::nested_list_marker(),
            Some(ErrorInput::Value(value)) => return ErrorNode::wrap_value(value),
            Some(ErrorInput::Callback) => return ErrorNode::wrap_value(FUNCTION_MARKER.into()),
            None => {
                return ErrorNode {
                    kind: Some(DEFAULT_NAME.to_string()),
                    ..ErrorNode::default()
                }
            }
        };

        items.fold(primary, |acc, item| {
            self.registry.attach_aggregate(acc, self.coerce(item))
        })
    }

    /// Canonical node for a list tail element
    fn coerce(&self, input: ErrorInput) -> ErrorNode {
        match input {
            ErrorInput::Node(node) => node,
            ErrorInput::List(_) => ErrorNode::nested_list_marker(),
            ErrorInput::Value(value) => ErrorNode::wrap_value(value),
            ErrorInput::Callback => ErrorNode::wrap_value(FUNCTION_MARKER.into()),
        }
    }

    // ─── Step 3: per-field projection ────────────────────────────────

    fn project_node(
        &self,
        node: &ErrorNode,
        map: &FieldMap,
        exclude: &ExcludePolicy,
    ) -> Map<String, Value> {
        let mut out = Map::new();

        for (path, output) in map.iter() {
            if exclude.is_suppressed(path.field) {
                continue;
            }

            match path.field {
                Field::Stack => {
                    out.insert(
                        output.to_string(),
                        Value::String(self.registry.render_stack(node, false)),
                    );
                }

                Field::From => {
                    let Some(from) = node.from.as_deref() else {
                        continue;
                    };
                    match path.leaf {
                        Some(leaf) => {
                            if let Some(value) = self.project_leaf(from, leaf) {
                                out.insert(output.to_string(), value);
                            }
                        }
                        None => {
                            let nested = resolve_exclude(
                                exclude,
                                Field::From,
                                ExcludePolicy::cause_defaults(),
                            );
                            out.insert(
                                output.to_string(),
                                Value::Object(self.project_node(from, map, &nested)),
                            );
                        }
                    }
                }

                Field::Errors => {
                    let Some(errors) = node.errors.as_ref() else {
                        continue;
                    };
                    // An empty aggregate is omitted, not emitted as []
                    if errors.is_empty() {
                        continue;
                    }
                    let rendered = match path.leaf {
                        Some(leaf) => errors
                            .iter()
                            .map(|error| self.project_leaf(error, leaf).unwrap_or(Value::Null))
                            .collect(),
                        None => {
                            let nested = resolve_exclude(
                                exclude,
                                Field::Errors,
                                ExcludePolicy::cause_defaults(),
                            );
                            errors
                                .iter()
                                .map(|error| Value::Object(self.project_node(error, map, &nested)))
                                .collect()
                        }
                    };
                    out.insert(output.to_string(), Value::Array(rendered));
                }

                Field::Fields => {
                    let Some(fields) = node.fields.as_ref() else {
                        continue;
                    };
                    let mut rendered = Map::new();
                    match path.leaf {
                        Some(leaf) => {
                            for (key, error) in fields {
                                if let Some(value) = self.project_leaf(error, leaf) {
                                    rendered.insert(key.clone(), value);
                                }
                            }
                        }
                        None => {
                            let nested = resolve_exclude(
                                exclude,
                                Field::Fields,
                                ExcludePolicy::keyed_defaults(),
                            );
                            for (key, error) in fields {
                                rendered.insert(
                                    key.clone(),
                                    Value::Object(self.project_node(error, map, &nested)),
                                );
                            }
                        }
                    }
                    // Unlike errors, a present-but-empty fields map stays visible
                    out.insert(output.to_string(), Value::Object(rendered));
                }

                Field::Message => {
                    let value = match &node.message {
                        Some(message) => message.clone(),
                        None => DEFAULT_MESSAGE.into(),
                    };
                    out.insert(output.to_string(), value);
                }

                Field::ClientSafeMessage => {
                    let value = match &node.client_safe_message {
                        Some(message) => message.as_str().into(),
                        None => DEFAULT_MESSAGE.into(),
                    };
                    out.insert(output.to_string(), value);
                }

                Field::Name => {
                    let value = node.name.as_deref().unwrap_or(DEFAULT_NAME);
                    out.insert(output.to_string(), value.into());
                }

                Field::StatusCode => {
                    let code = node.status_code.unwrap_or(DEFAULT_STATUS_CODE);
                    out.insert(output.to_string(), code.into());
                }

                Field::Field => {
                    if let Some(field) = &node.field {
                        out.insert(output.to_string(), field.as_str().into());
                    }
                }
            }
        }

        out
    }

    /// Extract one leaf value from a relation's own projection
    ///
    /// Projects with a singleton map and no exclusions, then pulls out the
    /// single key. `None` means the leaf produced no output (absent
    /// non-defaulting field).
    fn project_leaf(&self, node: &ErrorNode, leaf: Field) -> Option<Value> {
        self.project_node(node, &FieldMap::single(leaf), &ExcludePolicy::new())
            .remove(leaf.as_str())
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(BasicRegistry::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(input: ErrorInput) -> ErrorNode {
        Projector::default().normalize(input)
    }

    #[test]
    fn test_normalize_passes_nodes_through() {
        let node = ErrorNode::new("TestError", "boom");
        assert_eq!(normalize(node.clone().into()), node);
    }

    #[test]
    fn test_normalize_wraps_scalars() {
        let node = normalize(ErrorInput::Value(json!(42)));
        assert_eq!(node.kind.as_deref(), Some(DEFAULT_NAME));
        assert_eq!(node.message, Some(json!(42)));
        assert!(node.name.is_none());
    }

    #[test]
    fn test_normalize_masks_callbacks() {
        let node = normalize(ErrorInput::Callback);
        assert_eq!(node.message, Some(json!("[function]")));
    }

    #[test]
    fn test_normalize_folds_list_tail() {
        let node = normalize(ErrorInput::List(vec![
            ErrorNode::new("TestError", "first").into(),
            ErrorNode::new("TestError", "second").into(),
            ErrorInput::Value(json!("third")),
        ]));

        assert_eq!(node.message, Some(json!("first")));
        let errors = node.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, Some(json!("second")));
        assert_eq!(errors[1].message, Some(json!("third")));
    }

    #[test]
    fn test_normalize_list_of_lists_primary() {
        let node = normalize(ErrorInput::List(vec![
            ErrorInput::List(vec![]),
            ErrorNode::new("TestError", "second").into(),
        ]));

        assert_eq!(node.name.as_deref(), Some(DEFAULT_NAME));
        assert_eq!(node.message, Some(json!("[array of arrays]")));
        assert_eq!(node.errors.unwrap().len(), 1);
    }

    #[test]
    fn test_normalize_scalar_primary_drops_tail() {
        let node = normalize(ErrorInput::List(vec![
            ErrorInput::Value(json!(null)),
            ErrorNode::new("TestError", "second").into(),
        ]));

        assert_eq!(node.message, Some(Value::Null));
        assert!(node.errors.is_none());
    }

    #[test]
    fn test_normalize_empty_list() {
        let node = normalize(ErrorInput::List(vec![]));
        assert_eq!(node.kind.as_deref(), Some(DEFAULT_NAME));
        assert!(node.message.is_none());
    }

    #[test]
    fn test_leaf_extraction_defaults_and_absence() {
        let projector = Projector::default();
        let node = ErrorNode::default();

        // Defaulting leaves always produce a value
        assert_eq!(
            projector.project_leaf(&node, Field::ClientSafeMessage),
            Some(json!(DEFAULT_MESSAGE))
        );
        assert_eq!(
            projector.project_leaf(&node, Field::StatusCode),
            Some(json!(500))
        );
        // Non-defaulting leaves vanish when absent
        assert_eq!(projector.project_leaf(&node, Field::Field), None);
    }
}
