//! Link graph data model and snapshot

pub mod graph;
pub mod model;


pub use model::{Node, NodeKind, Edge, DOCUMENT_EXTENSION, PATH_SEPARATOR, HIDDEN_PREFIX};
pub use graph::Graph;
