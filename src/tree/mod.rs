/// Arena-backed parse tree shared by every backend.
pub mod arena;

/// Closed label vocabularies implemented per backend.
pub mod label;

/// Borrowed node handles, traversal and label queries.
pub mod node;

/// Serializable tree form used for ingestion and storage.
pub mod raw;

pub use arena::{Tree, TreeBuilder};
pub use label::{BackendLabel, LABEL_SEPARATOR};
pub use node::{Ancestors, Node, PreOrder};
pub use raw::RawNode;
