// Runtime executor for the pipeline DSL

use crate::binding::Binding;
use crate::color::Color;
use crate::data::{GroupId, Table};
use crate::error::PlotError;
use crate::layer::{LayerLines, LayerPaths};
use crate::parser::ast::{AestheticValue, Layer, PlotSpec};
use crate::plot::Plot;
use crate::render;
use crate::scale::{OrdinalColorScale, Value};
use crate::warning::{default_sink, WarningSink};
use crate::RenderOptions;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Render a plot specification to image bytes, reporting warnings on stderr
pub fn render_plot(spec: &PlotSpec, data: Table, options: &RenderOptions) -> Result<Vec<u8>> {
    let plot = build_plot(spec, data, default_sink())?;
    render::render_marks(&plot, options)
}

/// Group the data, register bindings and apply every layer in order
pub fn build_plot(spec: &PlotSpec, data: Table, warnings: Arc<dyn WarningSink>) -> Result<Plot> {
    // Validate: must have at least one layer
    if spec.layers.is_empty() {
        anyhow::bail!("Plot requires at least one geometry layer (lines or paths)");
    }

    let mut plot = Plot::with_warnings(data, warnings);

    for col in &spec.group_by {
        plot.group_by(col)
            .with_context(|| format!("Failed to group by '{}'", col))?;
    }

    for (property, value) in spec.aesthetics.entries() {
        let binding = to_binding(property, value, plot.data())
            .with_context(|| format!("Failed to bind '{}'", property))?;
        plot.set_binding(property, binding);
    }

    for layer in &spec.layers {
        let applied = match layer {
            Layer::Lines => plot.add(&LayerLines),
            Layer::Paths => plot.add(&LayerPaths),
        };
        applied.with_context(|| format!("Failed to apply {:?} layer", layer))?;
    }

    Ok(plot)
}

fn is_color_property(property: &str) -> bool {
    matches!(property, "color" | "fill")
}

/// Translate one aesthetic into a binding against `data`
fn to_binding(property: &str, value: &AestheticValue, data: &Table) -> Result<Binding, PlotError> {
    match value {
        AestheticValue::Mapped(col) => {
            data.column_index(col)?;
            if !is_color_property(property) {
                return Ok(Binding::column(col.as_str()));
            }
            let cells = column_cells(data, col)?;
            if cells.iter().all(|c| Color::parse(c).is_some()) {
                // Literal colors pass through the identity scale
                Ok(Binding::column(col.as_str()))
            } else {
                let scale = OrdinalColorScale::new(cells);
                Ok(Binding::column(col.as_str()).with_scale(GroupId::ROOT, Arc::new(scale)))
            }
        }
        AestheticValue::Text(text) if is_color_property(property) => {
            let color = Color::parse(text)
                .ok_or_else(|| PlotError::ScaleDomain(format!("unknown color {:?}", text)))?;
            Ok(Binding::constant(color))
        }
        AestheticValue::Text(text) => Ok(Binding::constant(Value::Text(text.clone()))),
        AestheticValue::Number(n) => Ok(Binding::constant(*n)),
    }
}

/// Every cell of `col`, in group traversal order
fn column_cells(data: &Table, col: &str) -> Result<Vec<String>, PlotError> {
    let mut cells = Vec::new();
    for gid in data.groups() {
        if let Some(group) = data.group(gid) {
            cells.extend(group.column(col)?.into_iter().map(str::to_string));
        }
    }
    Ok(cells)
}
