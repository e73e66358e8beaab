// Marks: renderer-facing descriptions of graphical primitives

use crate::binding::Binding;
use crate::data::{GroupId, Table};
use crate::error::{PlotError, Result};
use crate::scale::{Scaler, Value};
use std::sync::Arc;

/// A binding resolved for one group of one data snapshot.
///
/// Handles keep the table they were resolved against alive, so later
/// changes to the plot's current data (sorting, restoring) do not affect
/// what an already-emitted mark refers to.
#[derive(Debug, Clone)]
pub struct PropertyHandle {
    property: String,
    binding: Arc<Binding>,
    group: GroupId,
    scaler: Arc<dyn Scaler>,
    data: Arc<Table>,
}

impl PropertyHandle {
    pub(crate) fn new(property: &str, binding: Arc<Binding>, group: GroupId, data: Arc<Table>) -> Self {
        let scaler = binding.scaler_for(group);
        Self {
            property: property.to_string(),
            binding,
            group,
            scaler,
            data,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn is_constant(&self) -> bool {
        self.binding.is_constant()
    }

    /// Bound column, if the property is column-driven.
    pub fn column(&self) -> Option<&str> {
        self.binding.col()
    }

    /// Number of rows in the handle's group.
    pub fn len(&self) -> usize {
        self.data.group(self.group).map_or(0, |g| g.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unscaled values, one per row of the group. A constant repeats.
    pub fn row_values(&self) -> Result<Vec<Value>> {
        let group = self.data.group(self.group).ok_or_else(|| {
            PlotError::InvalidData(format!("group {} is not in the data", self.group))
        })?;
        match self.binding.as_ref() {
            Binding::Constant { value, .. } => Ok(vec![value.clone(); group.len()]),
            Binding::Column { col, .. } => {
                Ok(group.column(col)?.into_iter().map(Value::from_cell).collect())
            }
        }
    }

    /// Values mapped through the group's scale.
    pub fn values(&self) -> Result<Vec<Value>> {
        self.row_values()?
            .iter()
            .map(|v| self.scaler.map(v))
            .collect()
    }
}

impl PartialEq for PropertyHandle {
    fn eq(&self, other: &Self) -> bool {
        self.property == other.property
            && self.group == other.group
            && self.scaler.kind() == other.scaler.kind()
            && self.binding == other.binding
            && (Arc::ptr_eq(&self.data, &other.data) || *self.data == *other.data)
    }
}

/// One polyline or polygon over the rows of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMark {
    x: PropertyHandle,
    y: PropertyHandle,
    stroke: PropertyHandle,
    fill: PropertyHandle,
}

impl PathMark {
    pub fn new(x: PropertyHandle, y: PropertyHandle, stroke: PropertyHandle, fill: PropertyHandle) -> Self {
        Self { x, y, stroke, fill }
    }

    pub fn x(&self) -> &PropertyHandle {
        &self.x
    }

    pub fn y(&self) -> &PropertyHandle {
        &self.y
    }

    pub fn stroke(&self) -> &PropertyHandle {
        &self.stroke
    }

    pub fn fill(&self) -> &PropertyHandle {
        &self.fill
    }

    pub fn group(&self) -> GroupId {
        self.x.group()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Path(PathMark),
}
