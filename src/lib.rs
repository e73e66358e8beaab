// Library exports for gramlayer

pub mod binding;
pub mod color;
pub mod data;
pub mod error;
pub mod layer;
pub mod mark;
pub mod parser;
pub mod plot;
pub mod render;
pub mod runtime;
pub mod scale;
pub mod warning;

pub use binding::Binding;
pub use color::Color;
pub use data::{GroupId, Table};
pub use error::{PlotError, Result};
pub use layer::{layer_lines, layer_paths, LayerLines, LayerPaths, Plotter};
pub use mark::{Mark, PathMark, PropertyHandle};
pub use plot::{Plot, PlotScope};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_defaults() {
        let opts: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.width, 800);
        assert_eq!(opts.height, 600);
        assert_eq!(opts.format, OutputFormat::Png);
    }

    #[test]
    fn test_render_options_svg() {
        let opts: RenderOptions = serde_json::from_str(r#"{"width": 320, "type": "svg"}"#).unwrap();
        assert_eq!(opts.width, 320);
        assert_eq!(opts.height, 600);
        assert_eq!(opts.format, OutputFormat::Svg);
    }
}
