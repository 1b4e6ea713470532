//! # errshape
//!
//! Policy-driven projection of structured error trees into client-safe JSON.
//!
//! ## Overview
//!
//! `errshape` converts a domain error — possibly a tree of causally and
//! structurally related sub-errors — into a plain JSON-safe object suitable
//! for client responses or logs, while enforcing a configurable policy about
//! which internal details are exposed. By default only the client-safe
//! message leaves the building; internal messages, stacks, and status
//! details must be opted into.
//!
//! ## Quick Start
//!
//! ```rust
//! use errshape::{ErrorNode, Projector};
//!
//! let projector = Projector::default();
//!
//! let node = ErrorNode::new("NotifyUser", "db connection refused")
//!     .with_client_safe_message("We hit a problem saving your changes.")
//!     .with_status_code(503);
//!
//! // Default map: internal `message` is never exposed
//! let json = projector.project(node, None, None);
//! assert_eq!(json["message"], "We hit a problem saving your changes.");
//! assert_eq!(json["name"], "NotifyUser");
//! assert_eq!(json["status_code"], 503);
//! ```
//!
//! ## Architecture
//!
//! - **ErrorNode** — the error contract: a message pair, identity fields, and
//!   three relation kinds (`from` cause chain, aggregated `errors`, keyed
//!   `fields`)
//! - **FieldMap** — which source fields appear in output and under what key;
//!   dotted paths (`from.message`) pull one nested leaf to the top level
//! - **ExcludePolicy** — suppression rules, inherited down every relation hop
//!   with per-relation safety defaults
//! - **ErrorRegistry** trait — seam to the external error-factory system
//!   (aggregation, stack rendering)
//! - **Projector** — the pure, never-failing projection itself

pub mod error;
pub mod exclude;
pub mod map;
pub mod project;
pub mod registry;
pub mod types;

// Re-export core types
pub use error::{ProjectionError, Result};
pub use exclude::{resolve_exclude, ExcludePolicy, ExcludeRule};
pub use map::{Field, FieldMap, FieldPath};
pub use project::Projector;
pub use registry::{BasicRegistry, ErrorRegistry};
pub use types::{
    ErrorInput, ErrorNode, DEFAULT_MESSAGE, DEFAULT_NAME, DEFAULT_STATUS_CODE,
};
