//! Code generators: a standalone HTML page, or a component plus its
//! stylesheet. Both walk the project read-only, resolving bound content
//! through `sk_core::binding`.

pub mod animation;
pub mod component;
pub mod context;
pub mod css;
pub mod escape;
pub mod html;
pub mod strategy;

pub use component::{ComponentExport, generate_component};
pub use context::ExportOptions;
pub use css::generate_stylesheet;
pub use escape::sanitize_component_name;
pub use html::generate_html;
