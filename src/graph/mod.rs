//! Entry dependency graph rendering.
//!
//! Resolves a named entry through an [`EntryResolver`], walks its parent
//! links depth-first, and renders the ancestry (plus the output-entry
//! ancestry, when the metadata links one) to DOT source and an SVG image.

pub mod dot;
pub mod entry;
pub mod metadata;
pub mod render;
pub mod svg;
pub mod traverse;

pub use entry::{DirCatalog, Entry, EntryResolver};
pub use render::{draw, RenderOutcome, OUTPUT_CLUSTER_LABEL, TARGET_CLUSTER_LABEL};
pub use traverse::{dfs, NodeColor, RenderSession};
