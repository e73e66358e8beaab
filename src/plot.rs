// Plot context: bindings, marks and saved state

use crate::binding::Binding;
use crate::data::{GroupId, Table};
use crate::error::{PlotError, Result};
use crate::layer::Plotter;
use crate::mark::{Mark, PropertyHandle};
use crate::warning::{default_sink, WarningSink};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Saved data and bindings.
#[derive(Debug, Clone)]
struct Frame {
    data: Arc<Table>,
    bindings: BTreeMap<String, Arc<Binding>>,
}

/// Build-time context: current data, binding registry, emitted marks and
/// a stack of saved states.
///
/// A plot is built on one thread by applying plotters in order. Marks are
/// append-only; everything else can be saved and restored.
pub struct Plot {
    data: Arc<Table>,
    bindings: BTreeMap<String, Arc<Binding>>,
    marks: Vec<Mark>,
    stack: Vec<Frame>,
    warnings: Arc<dyn WarningSink>,
}

impl Plot {
    /// New plot over `data`. Warnings are printed to stderr; use
    /// [`Plot::with_warnings`] to route them elsewhere, e.g. to a
    /// `TracingSink` when a subscriber is installed.
    pub fn new(data: Table) -> Self {
        Self::with_warnings(data, default_sink())
    }

    pub fn with_warnings(data: Table, warnings: Arc<dyn WarningSink>) -> Self {
        Self {
            data: Arc::new(data),
            bindings: BTreeMap::new(),
            marks: Vec::new(),
            stack: Vec::new(),
            warnings,
        }
    }

    /// The current data.
    pub fn data(&self) -> &Table {
        &self.data
    }

    pub fn bindings(&self) -> &BTreeMap<String, Arc<Binding>> {
        &self.bindings
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn push_mark(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Depth of the saved-state stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Bind `property` to `binding`, replacing any existing binding.
    pub fn set_binding(&mut self, property: &str, binding: Binding) -> &mut Self {
        self.bindings.insert(property.to_string(), Arc::new(binding));
        self
    }

    pub fn get_binding(&self, name: &str) -> Option<Arc<Binding>> {
        self.bindings.get(name).cloned()
    }

    pub fn must_get_binding(&self, name: &str) -> Result<Arc<Binding>> {
        self.get_binding(name)
            .ok_or_else(|| PlotError::MissingBinding(name.to_string()))
    }

    /// Resolve `binding` for group `gid` of the current data.
    pub fn use_property(&self, property: &str, binding: &Arc<Binding>, gid: GroupId) -> PropertyHandle {
        PropertyHandle::new(property, Arc::clone(binding), gid, Arc::clone(&self.data))
    }

    /// Push the current data and bindings.
    pub fn save(&mut self) -> &mut Self {
        self.stack.push(Frame {
            data: Arc::clone(&self.data),
            bindings: self.bindings.clone(),
        });
        self
    }

    /// Pop the most recent save.
    pub fn restore(&mut self) -> Result<&mut Self> {
        let frame = self.stack.pop().ok_or(PlotError::UnbalancedRestore)?;
        self.data = frame.data;
        self.bindings = frame.bindings;
        Ok(self)
    }

    /// Save now and restore when the returned guard is dropped.
    pub fn scope(&mut self) -> PlotScope<'_> {
        self.save();
        let depth = self.stack.len();
        PlotScope { plot: self, depth }
    }

    /// Sort the current data ascending by `col` within each group.
    pub fn sort_by(&mut self, col: &str) -> Result<&mut Self> {
        self.data = Arc::new(self.data.sort_by(col)?);
        Ok(self)
    }

    /// Split every current group by the values of `col`.
    pub fn group_by(&mut self, col: &str) -> Result<&mut Self> {
        self.data = Arc::new(self.data.group_by(col)?);
        Ok(self)
    }

    pub fn add<P: Plotter + ?Sized>(&mut self, plotter: &P) -> Result<&mut Self> {
        plotter.apply(self)?;
        Ok(self)
    }

    pub fn warn(&self, message: &str) {
        self.warnings.warn(message);
    }
}

impl std::fmt::Debug for Plot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plot")
            .field("data", &self.data)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("marks", &self.marks.len())
            .field("depth", &self.stack.len())
            .finish()
    }
}

/// Guard returned by [`Plot::scope`]. Restores the saved state on drop,
/// including when unwinding or returning early with an error.
pub struct PlotScope<'a> {
    plot: &'a mut Plot,
    depth: usize,
}

impl Deref for PlotScope<'_> {
    type Target = Plot;

    fn deref(&self) -> &Plot {
        self.plot
    }
}

impl DerefMut for PlotScope<'_> {
    fn deref_mut(&mut self) -> &mut Plot {
        self.plot
    }
}

impl Drop for PlotScope<'_> {
    fn drop(&mut self) {
        // Unwind saves left open inside the scope, then our own.
        while self.plot.stack.len() >= self.depth {
            if self.plot.restore().is_err() {
                break;
            }
        }
    }
}
