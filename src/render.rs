// Draws path marks with plotters and encodes PNG/SVG output

use crate::color::Color;
use crate::error::{PlotError, Result as PlotResult};
use crate::mark::{Mark, PathMark, PropertyHandle};
use crate::plot::Plot;
use crate::scale::{pad_range, Value};
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Color as _;
use std::ops::Range;

/// Geometry and colors of a path mark, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub points: Vec<(f64, f64)>,
    /// One color per segment: `points[i] -> points[i + 1]` uses `segment_colors[i]`.
    pub segment_colors: Vec<Color>,
    pub fill: Color,
}

/// Materialize a path mark's handles into points and colors.
pub fn resolve_path(mark: &PathMark) -> PlotResult<ResolvedPath> {
    let xs = numbers(mark.x())?;
    let ys = numbers(mark.y())?;
    if xs.len() != ys.len() {
        return Err(PlotError::InvalidData(format!(
            "x and y have different lengths (x: {}, y: {})",
            xs.len(),
            ys.len()
        )));
    }
    let points: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();

    let strokes = colors(mark.stroke())?;
    // Each segment takes the color of its starting vertex.
    let segment_colors = strokes
        .iter()
        .take(points.len().saturating_sub(1))
        .copied()
        .collect();

    let fill = colors(mark.fill())?.first().copied().unwrap_or(Color::TRANSPARENT);

    Ok(ResolvedPath { points, segment_colors, fill })
}

fn numbers(handle: &PropertyHandle) -> PlotResult<Vec<f64>> {
    handle
        .values()?
        .into_iter()
        .map(|v| {
            match v.as_number() {
                Some(n) if n.is_finite() => Ok(n),
                _ => Err(PlotError::ScaleDomain(format!(
                    "{} is not a finite number for '{}'",
                    v,
                    handle.property()
                ))),
            }
        })
        .collect()
}

fn colors(handle: &PropertyHandle) -> PlotResult<Vec<Color>> {
    handle
        .values()?
        .into_iter()
        .map(|v: Value| {
            v.as_color().ok_or_else(|| {
                PlotError::ScaleDomain(format!("{} is not a color for '{}'", v, handle.property()))
            })
        })
        .collect()
}

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Render every path mark of the plot to PNG or SVG bytes.
pub fn render_marks(plot: &Plot, options: &RenderOptions) -> Result<Vec<u8>> {
    let paths = plot
        .marks()
        .iter()
        .map(|m| match m {
            Mark::Path(p) => resolve_path(p),
        })
        .collect::<PlotResult<Vec<_>>>()
        .context("Failed to resolve marks")?;

    if paths.is_empty() {
        anyhow::bail!("Nothing to render: the plot has no marks");
    }

    if options.width == 0 || options.height == 0 {
        anyhow::bail!(
            "Image dimensions must be non-zero (got {}x{})",
            options.width,
            options.height
        );
    }
    if options.width > MAX_DIMENSION || options.height > MAX_DIMENSION {
        anyhow::bail!(
            "Image of {}x{} pixels is too large (max {} per side)",
            options.width,
            options.height,
            MAX_DIMENSION
        );
    }

    let (x_range, y_range) = data_ranges(&paths);

    match options.format {
        OutputFormat::Png => {
            let len = (options.width as usize)
                .checked_mul(options.height as usize)
                .and_then(|n| n.checked_mul(3))
                .with_context(|| {
                    format!("Image of {}x{} pixels is too large", options.width, options.height)
                })?;
            let mut buffer = vec![0u8; len];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (options.width, options.height))
                    .into_drawing_area();
                draw_paths(&root, &paths, x_range, y_range)?;
                root.present().context("Failed to present drawing")?;
            }
            encode_png(&buffer, options.width, options.height)
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
                    .into_drawing_area();
                draw_paths(&root, &paths, x_range, y_range)?;
                root.present().context("Failed to present drawing")?;
            }
            Ok(svg.into_bytes())
        }
    }
}

fn data_ranges(paths: &[ResolvedPath]) -> (Range<f64>, Range<f64>) {
    let points = paths.iter().flat_map(|p| p.points.iter());
    let (mut x_min, mut x_max, mut y_min, mut y_max) =
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    let (x0, x1) = pad_range(x_min, x_max);
    let (y0, y1) = pad_range(y_min, y_max);
    (x0..x1, y0..y1)
}

fn draw_paths<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    paths: &[ResolvedPath],
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    // Fills go underneath every stroke.
    for path in paths.iter().filter(|p| !p.fill.is_transparent()) {
        chart
            .draw_series(std::iter::once(Polygon::new(
                path.points.clone(),
                to_rgba(path.fill).filled(),
            )))
            .context("Failed to draw polygon")?;
    }

    for path in paths {
        let segments = path
            .points
            .windows(2)
            .zip(&path.segment_colors)
            .filter(|(_, color)| !color.is_transparent())
            .map(|(pair, &color)| PathElement::new(pair.to_vec(), to_rgba(color).stroke_width(1)));
        chart
            .draw_series(segments)
            .context("Failed to draw path segments")?;
    }

    Ok(())
}

fn to_rgba(color: Color) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.alpha())
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::data::Table;
    use crate::layer::{LayerLines, LayerPaths};

    fn plot(rows: &[&[&str]]) -> Plot {
        let mut p = Plot::new(Table::new(
            vec!["x".to_string(), "y".to_string(), "c".to_string()],
            rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
        .unwrap());
        p.set_binding("x", Binding::column("x")).set_binding("y", Binding::column("y"));
        p
    }

    fn only_path(p: &Plot) -> &PathMark {
        match &p.marks()[0] {
            Mark::Path(m) => m,
        }
    }

    #[test]
    fn test_resolve_segment_colors_from_start_vertex() {
        let mut p = plot(&[&["0", "0", "red"], &["1", "1", "red"], &["2", "0", "blue"]]);
        p.set_binding("color", Binding::column("c"));
        p.add(&LayerPaths).unwrap();

        let resolved = resolve_path(only_path(&p)).unwrap();
        assert_eq!(resolved.points, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert_eq!(resolved.segment_colors, vec![Color::RED, Color::RED]);
        assert_eq!(resolved.fill, Color::TRANSPARENT);
    }

    #[test]
    fn test_resolve_fill_from_first_vertex() {
        let mut p = plot(&[&["0", "0", "green"], &["1", "1", "blue"]]);
        p.set_binding("fill", Binding::column("c"));
        p.add(&LayerPaths).unwrap();

        let resolved = resolve_path(only_path(&p)).unwrap();
        assert_eq!(resolved.fill, Color::GREEN);
        assert_eq!(resolved.segment_colors, vec![Color::BLACK]);
    }

    #[test]
    fn test_resolve_rejects_non_color() {
        let mut p = plot(&[&["0", "0", "not-a-color"], &["1", "1", "x"]]);
        p.set_binding("color", Binding::column("c"));
        p.add(&LayerPaths).unwrap();
        assert!(matches!(resolve_path(only_path(&p)), Err(PlotError::ScaleDomain(_))));
    }

    #[test]
    fn test_resolve_rejects_non_numeric_x() {
        let mut p = plot(&[&["a", "0", "red"], &["b", "1", "red"]]);
        p.add(&LayerPaths).unwrap();
        assert!(matches!(resolve_path(only_path(&p)), Err(PlotError::ScaleDomain(_))));
    }

    #[test]
    fn test_resolve_rejects_non_finite_x() {
        for bad in ["inf", "NaN", "-inf"] {
            let mut p = plot(&[&[bad, "0", "red"], &["1", "1", "red"]]);
            p.add(&LayerPaths).unwrap();
            assert!(matches!(resolve_path(only_path(&p)), Err(PlotError::ScaleDomain(_))));
        }
    }

    #[test]
    fn test_render_rejects_zero_dimensions() {
        let mut p = plot(&[&["0", "0", "red"], &["1", "1", "red"]]);
        p.add(&LayerPaths).unwrap();
        for (width, height) in [(0, 48), (64, 0)] {
            let options = RenderOptions { width, height, format: OutputFormat::Png };
            let err = render_marks(&p, &options).unwrap_err();
            assert!(err.to_string().contains("non-zero"), "{}", err);
        }
    }

    #[test]
    fn test_render_rejects_oversized_image() {
        let mut p = plot(&[&["0", "0", "red"], &["1", "1", "red"]]);
        p.add(&LayerPaths).unwrap();
        // 70000 * 70000 * 3 does not fit in a u32.
        for format in [OutputFormat::Png, OutputFormat::Svg] {
            let options = RenderOptions { width: 70_000, height: 70_000, format };
            let err = render_marks(&p, &options).unwrap_err();
            assert!(err.to_string().contains("too large"), "{}", err);
        }
    }

    #[test]
    fn test_render_requires_marks() {
        let p = plot(&[]);
        assert!(render_marks(&p, &RenderOptions::default()).is_err());
    }

    #[test]
    fn test_render_svg() {
        let mut p = plot(&[&["2", "1", "red"], &["0", "0", "red"], &["1", "3", "red"]]);
        p.set_binding("fill", Binding::constant(Color::new(0, 0, 255, 64)));
        p.add(&LayerLines).unwrap();

        let options = RenderOptions { width: 200, height: 100, format: OutputFormat::Svg };
        let bytes = render_marks(&p, &options).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("polygon") || svg.contains("polyline"));
    }

    #[test]
    fn test_render_png_signature() {
        let mut p = plot(&[&["0", "0", "red"], &["1", "1", "red"]]);
        p.add(&LayerPaths).unwrap();
        let options = RenderOptions { width: 64, height: 48, format: OutputFormat::Png };
        let bytes = render_marks(&p, &options).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
