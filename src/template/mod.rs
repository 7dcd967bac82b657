//! Tera-backed rendering of request and expectation templates.
mod renderer;


pub use renderer::{RenderedRequest, Renderer, check_syntax, has_template_tags};
pub(crate) use renderer::read_body_file;
