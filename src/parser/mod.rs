// Pipeline DSL parser module

pub mod aesthetics;
pub mod ast;
pub mod geom;
pub mod lexer;
pub mod pipeline;

// Public API re-exports
pub use ast::{AestheticValue, Aesthetics, Layer, PlotSpec};
pub use pipeline::parse_plot_spec;
