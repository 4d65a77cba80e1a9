pub mod binding;
pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod lint;
pub mod model;
pub mod project;
pub mod tree;

pub use binding::{ResolvedImage, ResolvedList, ResolvedText, resolve_image, resolve_list, resolve_text};
pub use document::Document;
pub use error::{Error, Result};
pub use geometry::ResizeHandle;
pub use id::NodeId;
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use project::{Project, ProjectSettings, SeoSettings};
pub use tree::ContainmentGraph;
