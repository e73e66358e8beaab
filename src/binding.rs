// Bindings resolve a visual property to data

use crate::data::GroupId;
use crate::scale::{IdentityScale, Scaler, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-group scales of a binding.
pub type ScaleMap = BTreeMap<GroupId, Arc<dyn Scaler>>;

/// How a visual property gets its values: one constant for every row, or
/// the cells of a named column.
#[derive(Debug, Clone)]
pub enum Binding {
    Constant { value: Value, scales: ScaleMap },
    Column { col: String, scales: ScaleMap },
}

impl Binding {
    /// Constant binding with an identity scale on the root group.
    pub fn constant(value: impl Into<Value>) -> Self {
        Binding::Constant { value: value.into(), scales: root_identity() }
    }

    /// Column binding with an identity scale on the root group.
    pub fn column(col: impl Into<String>) -> Self {
        Binding::Column { col: col.into(), scales: root_identity() }
    }

    /// Register the scale used for `gid`.
    pub fn with_scale(mut self, gid: GroupId, scaler: Arc<dyn Scaler>) -> Self {
        self.scales_mut().insert(gid, scaler);
        self
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Binding::Constant { .. })
    }

    /// Column name, if this is a column binding.
    pub fn col(&self) -> Option<&str> {
        match self {
            Binding::Column { col, .. } => Some(col),
            Binding::Constant { .. } => None,
        }
    }

    pub fn scales(&self) -> &ScaleMap {
        match self {
            Binding::Constant { scales, .. } | Binding::Column { scales, .. } => scales,
        }
    }

    fn scales_mut(&mut self) -> &mut ScaleMap {
        match self {
            Binding::Constant { scales, .. } | Binding::Column { scales, .. } => scales,
        }
    }

    /// Scale for `gid`, falling back to the root group's, then to identity.
    pub fn scaler_for(&self, gid: GroupId) -> Arc<dyn Scaler> {
        let scales = self.scales();
        scales
            .get(&gid)
            .or_else(|| scales.get(&GroupId::ROOT))
            .cloned()
            .unwrap_or_else(|| Arc::new(IdentityScale) as Arc<dyn Scaler>)
    }
}

fn root_identity() -> ScaleMap {
    let mut scales: ScaleMap = BTreeMap::new();
    scales.insert(GroupId::ROOT, Arc::new(IdentityScale));
    scales
}

// Scalers are opaque; two scale maps match when they cover the same groups
// with scales of the same kind.
fn same_scales(a: &ScaleMap, b: &ScaleMap) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|((ga, sa), (gb, sb))| ga == gb && (Arc::ptr_eq(sa, sb) || sa.kind() == sb.kind()))
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Binding::Constant { value: a, scales: sa },
                Binding::Constant { value: b, scales: sb },
            ) => a == b && same_scales(sa, sb),
            (Binding::Column { col: a, scales: sa }, Binding::Column { col: b, scales: sb }) => {
                a == b && same_scales(sa, sb)
            }
            _ => false,
        }
    }
}
