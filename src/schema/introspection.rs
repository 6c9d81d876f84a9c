//! Adaptive query construction via GraphQL schema introspection.
//!
//! This module discovers a working field selection for the catalog listing
//! query by asking the remote service for its own schema. The introspection
//! response is folded into a [`TypeGraph`] (nodes keyed by type name, edges
//! by field name), and a depth-bounded walk over that graph renders the
//! selection text. The derived selection is validated with one minimal-size
//! probe request before it is handed to the shape selector.
//!
//! Introspection traffic is never retried: a service that rejects
//! introspection is an expected condition, not a transient one, and the
//! selector falls back to its static templates.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::Transport;
use crate::schema::probe_selection;

/// The root query field holding the game collection.
pub const COLLECTION_FIELD: &str = "apps";

/// The connection field holding the per-page item list.
pub const ITEMS_FIELD: &str = "items";

/// Maximum object-expansion depth below the item type.
///
/// Depth 2 covers the deepest nesting the feed needs (variant objects and
/// their status objects) while keeping self-referential schema types from
/// expanding without bound.
pub const MAX_SELECTION_DEPTH: u8 = 2;

/// Introspection query enumerating every type with its fields and the
/// wrapper chain of each field's return type.
///
/// Three levels of `ofType` unwrap the worst case the catalog schema uses
/// (`NON_NULL` of `LIST` of `NON_NULL` of a named type).
pub const INTROSPECTION_QUERY: &str = "{ __schema { queryType { name } \
     types { name kind fields { name \
     type { name kind ofType { name kind ofType { name kind ofType { name kind } } } } } } } }";

/// One outgoing edge of a type node: a field and its resolved type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldEdge {
    /// The field name as it appears in a selection.
    pub name: String,
    /// The effective (unwrapped) named type the field returns.
    pub type_name: String,
}

/// An explicit graph of the remote schema's object types.
///
/// Nodes are keyed by type name; edges by field name. Only types that carry
/// fields are recorded, so scalar and enum names simply have no entry and
/// render as leaf fields during selection building.
#[derive(Clone, Debug)]
pub struct TypeGraph {
    query_root: String,
    types: HashMap<String, Vec<FieldEdge>>,
}

impl TypeGraph {
    /// Builds the graph from an introspection response's `data` value.
    ///
    /// Returns `None` when the response is missing the `__schema` envelope
    /// or the root query type name.
    #[must_use]
    pub fn from_introspection(data: &Value) -> Option<Self> {
        let schema = data.get("__schema")?;
        let query_root = schema
            .get("queryType")
            .and_then(|q| q.get("name"))
            .and_then(Value::as_str)?
            .to_string();

        let mut types = HashMap::new();
        for ty in schema.get("types").and_then(Value::as_array)? {
            let Some(type_name) = ty.get("name").and_then(Value::as_str) else {
                continue;
            };
            let Some(fields) = ty.get("fields").and_then(Value::as_array) else {
                continue;
            };

            let mut edges = Vec::with_capacity(fields.len());
            for field in fields {
                let Some(field_name) = field.get("name").and_then(Value::as_str) else {
                    continue;
                };
                let Some(field_type) = field.get("type").and_then(unwrap_type_name) else {
                    continue;
                };
                edges.push(FieldEdge {
                    name: field_name.to_string(),
                    type_name: field_type,
                });
            }
            types.insert(type_name.to_string(), edges);
        }

        Some(Self { query_root, types })
    }

    /// Returns the name of the root query type.
    #[must_use]
    pub fn query_root(&self) -> &str {
        &self.query_root
    }

    /// Resolves the effective type name of a field on the given type.
    #[must_use]
    pub fn field_type(&self, type_name: &str, field_name: &str) -> Option<&str> {
        self.types
            .get(type_name)?
            .iter()
            .find(|edge| edge.name == field_name)
            .map(|edge| edge.type_name.as_str())
    }

    /// Renders a field selection for the given type, expanding object-typed
    /// fields up to `depth` levels.
    ///
    /// Meta fields (reserved `__` prefix) are skipped. An object-typed field
    /// whose expansion budget is exhausted, or whose own selection renders
    /// empty, is dropped rather than emitted without a sub-selection.
    #[must_use]
    pub fn build_selection(&self, type_name: &str, depth: u8) -> String {
        let Some(edges) = self.types.get(type_name) else {
            return String::new();
        };

        let mut parts = Vec::with_capacity(edges.len());
        for edge in edges {
            if edge.name.starts_with("__") {
                continue;
            }

            let is_object = self
                .types
                .get(&edge.type_name)
                .map_or(false, |fields| !fields.is_empty());

            if is_object {
                if depth == 0 {
                    continue;
                }
                let sub = self.build_selection(&edge.type_name, depth - 1);
                if sub.is_empty() {
                    continue;
                }
                parts.push(format!("{} {{ {} }}", edge.name, sub));
            } else {
                parts.push(edge.name.clone());
            }
        }

        parts.join(" ")
    }
}

/// Resolves a field's effective type name by unwrapping `NON_NULL` and
/// `LIST` modifier wrappers until a bare named type is reached.
fn unwrap_type_name(field_type: &Value) -> Option<String> {
    let mut current = field_type;
    loop {
        if let Some(name) = current.get("name").and_then(Value::as_str) {
            return Some(name.to_string());
        }
        current = current.get("ofType")?;
    }
}

/// Discovers a validated field selection for the catalog listing query.
///
/// Issues one non-retried introspection request, derives the selection from
/// the resulting [`TypeGraph`], and validates it with one minimal-size probe
/// before returning it. Any failure along the way yields `None`; the caller
/// falls back to static templates.
pub async fn discover_shape(transport: &Transport) -> Option<String> {
    let data = match transport.execute(INTROSPECTION_QUERY).await {
        Ok(data) => data,
        Err(error) => {
            tracing::debug!("Introspection request failed: {error}");
            return None;
        }
    };

    let Some(graph) = TypeGraph::from_introspection(&data) else {
        tracing::debug!("Introspection response missing schema metadata");
        return None;
    };

    let Some(connection_type) = graph.field_type(graph.query_root(), COLLECTION_FIELD) else {
        tracing::debug!(
            "Root query type {} has no '{COLLECTION_FIELD}' field",
            graph.query_root()
        );
        return None;
    };

    let Some(item_type) = graph.field_type(connection_type, ITEMS_FIELD) else {
        tracing::debug!("Connection type {connection_type} has no '{ITEMS_FIELD}' field");
        return None;
    };

    let selection = graph.build_selection(item_type, MAX_SELECTION_DEPTH);
    if selection.is_empty() {
        tracing::debug!("Derived selection for {item_type} is empty");
        return None;
    }

    // One minimal probe validates the shape before it is ever selected.
    if probe_selection(transport, &selection).await {
        tracing::debug!(
            selection_len = selection.len(),
            "Introspected selection validated by probe"
        );
        Some(selection)
    } else {
        tracing::debug!("Probe rejected introspected selection");
        None
    }
}
