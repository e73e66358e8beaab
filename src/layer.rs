// Layers: plotters that emit one mark per data group

use crate::binding::Binding;
use crate::color::Color;
use crate::error::Result;
use crate::mark::{Mark, PathMark};
use crate::plot::Plot;
use std::sync::Arc;

/// A deferred action applied to a plot, typically appending marks.
pub trait Plotter {
    fn apply(&self, plot: &mut Plot) -> Result<()>;
}

impl<F> Plotter for F
where
    F: Fn(&mut Plot) -> Result<()>,
{
    fn apply(&self, plot: &mut Plot) -> Result<()> {
        self(plot)
    }
}

pub const SINGLE_POINT_WARNING: &str = "cannot layer path through 1 point; ignoring";

/// Connects successive rows of each group with straight segments.
///
/// Properties:
/// - `x`, `y` (required): vertex positions.
/// - `color`: stroke color of each segment, taken from the segment's first
///   vertex. Defaults to opaque black.
/// - `fill`: polygon fill, taken from the group's first vertex. Defaults to
///   transparent, so the path is only stroked.
///
/// Empty groups are skipped; single-row groups are skipped with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerPaths;

impl Plotter for LayerPaths {
    fn apply(&self, plot: &mut Plot) -> Result<()> {
        let xb = plot.must_get_binding("x")?;
        let yb = plot.must_get_binding("y")?;
        // Defaults stay local to this application.
        let colorb = plot
            .get_binding("color")
            .unwrap_or_else(|| Arc::new(Binding::constant(Color::BLACK)));
        let fillb = plot
            .get_binding("fill")
            .unwrap_or_else(|| Arc::new(Binding::constant(Color::TRANSPARENT)));

        let gids: Vec<_> = plot.data().groups().collect();
        for gid in gids {
            let len = plot.data().group(gid).map_or(0, |g| g.len());
            match len {
                0 => continue,
                1 => {
                    // TODO: round or square stroke caps would make this drawable.
                    plot.warn(SINGLE_POINT_WARNING);
                    continue;
                }
                _ => {}
            }

            let mark = PathMark::new(
                plot.use_property("x", &xb, gid),
                plot.use_property("y", &yb, gid),
                plot.use_property("stroke", &colorb, gid),
                plot.use_property("fill", &fillb, gid),
            );
            tracing::debug!(group = %gid, rows = len, "emitting path mark");
            plot.push_mark(Mark::Path(mark));
        }
        Ok(())
    }
}

/// Like [`LayerPaths`], but traverses each group in ascending `x` order.
///
/// A constant `x` leaves the row order untouched. The plot's data and
/// bindings are the same after application as before.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerLines;

impl Plotter for LayerLines {
    fn apply(&self, plot: &mut Plot) -> Result<()> {
        let xb = plot.must_get_binding("x")?;
        match xb.col() {
            None => LayerPaths.apply(plot),
            Some(col) => {
                let mut scope = plot.scope();
                scope.sort_by(col)?;
                LayerPaths.apply(&mut scope)
            }
        }
    }
}

pub fn layer_paths() -> LayerPaths {
    LayerPaths
}

pub fn layer_lines() -> LayerLines {
    LayerLines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GroupId, Table};
    use crate::error::PlotError;
    use crate::scale::Value;
    use crate::warning::CollectingSink;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
        .unwrap()
    }

    fn xy_plot(sink: Arc<CollectingSink>) -> Plot {
        let mut p = Plot::with_warnings(table(&["x", "y"], &[&["3", "9"], &["1", "7"], &["2", "8"]]), sink);
        p.set_binding("x", Binding::column("x")).set_binding("y", Binding::column("y"));
        p
    }

    fn path(mark: &Mark) -> &PathMark {
        match mark {
            Mark::Path(p) => p,
        }
    }

    #[test]
    fn test_paths_default_stroke_and_fill() {
        let sink = Arc::new(CollectingSink::new());
        let mut p = xy_plot(sink.clone());
        p.add(&LayerPaths).unwrap();

        assert_eq!(p.marks().len(), 1);
        let m = path(&p.marks()[0]);
        assert_eq!(m.stroke().property(), "stroke");
        assert_eq!(m.stroke().values().unwrap(), vec![Value::Color(Color::BLACK); 3]);
        assert_eq!(m.fill().values().unwrap(), vec![Value::Color(Color::TRANSPARENT); 3]);
        assert_eq!(
            m.x().values().unwrap(),
            vec![Value::Number(3.0), Value::Number(1.0), Value::Number(2.0)]
        );
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_paths_defaults_not_registered() {
        let mut p = xy_plot(Arc::new(CollectingSink::new()));
        p.add(&LayerPaths).unwrap();
        assert!(p.get_binding("color").is_none());
        assert!(p.get_binding("fill").is_none());
    }

    #[test]
    fn test_paths_missing_y() {
        let mut p = Plot::new(table(&["x"], &[&["1"], &["2"]]));
        p.set_binding("x", Binding::column("x"));
        assert_eq!(p.add(&LayerPaths).unwrap_err(), PlotError::MissingBinding("y".to_string()));
        assert!(p.marks().is_empty());
    }

    #[test]
    fn test_lines_sorts_x() {
        let mut p = xy_plot(Arc::new(CollectingSink::new()));
        p.add(&LayerLines).unwrap();
        let m = path(&p.marks()[0]);
        assert_eq!(
            m.x().values().unwrap(),
            vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]
        );
        assert_eq!(
            m.y().values().unwrap(),
            vec![Value::Number(7.0), Value::Number(8.0), Value::Number(9.0)]
        );
        assert_eq!(p.depth(), 0);
    }

    #[test]
    fn test_lines_constant_x_keeps_order() {
        let mut p = xy_plot(Arc::new(CollectingSink::new()));
        p.set_binding("x", Binding::constant(5.0));
        p.add(&LayerLines).unwrap();
        let m = path(&p.marks()[0]);
        assert_eq!(
            m.y().values().unwrap(),
            vec![Value::Number(9.0), Value::Number(7.0), Value::Number(8.0)]
        );
    }

    #[test]
    fn test_lines_unknown_x_column_restores() {
        let mut p = xy_plot(Arc::new(CollectingSink::new()));
        p.set_binding("x", Binding::column("renamed"));
        let before = p.data().clone();
        assert_eq!(p.add(&LayerLines).unwrap_err(), PlotError::UnknownColumn("renamed".to_string()));
        assert_eq!(*p.data(), before);
        assert_eq!(p.depth(), 0);
        assert!(p.marks().is_empty());
    }

    #[test]
    fn test_closure_plotter() {
        let mut p = xy_plot(Arc::new(CollectingSink::new()));
        let twice = |p: &mut Plot| -> Result<()> {
            p.add(&LayerPaths)?.add(&LayerPaths)?;
            Ok(())
        };
        p.add(&twice).unwrap();
        assert_eq!(p.marks().len(), 2);
        assert_eq!(p.marks()[0], p.marks()[1]);
        assert_eq!(path(&p.marks()[0]).group(), GroupId::ROOT);
    }

    #[test]
    fn test_constructors() {
        let mut p = xy_plot(Arc::new(CollectingSink::new()));
        p.add(&layer_paths()).unwrap().add(&layer_lines()).unwrap();
        assert_eq!(p.marks().len(), 2);
    }
}
