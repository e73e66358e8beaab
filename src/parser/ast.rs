// Abstract Syntax Tree for the pipeline DSL

/// Complete plot specification
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotSpec {
    pub aesthetics: Aesthetics,
    /// Grouping columns, applied in order
    pub group_by: Vec<String>,
    pub layers: Vec<Layer>,
}

/// Aesthetic mappings (visual property -> column or constant)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aesthetics {
    pub x: Option<AestheticValue>,
    pub y: Option<AestheticValue>,
    pub color: Option<AestheticValue>,
    pub fill: Option<AestheticValue>,
}

impl Aesthetics {
    /// Overlay `other` on top of `self`; properties set in `other` win.
    pub fn merge(&mut self, other: Aesthetics) {
        self.x = other.x.or(self.x.take());
        self.y = other.y.or(self.y.take());
        self.color = other.color.or(self.color.take());
        self.fill = other.fill.or(self.fill.take());
    }

    /// Property name / value pairs that are set, in a fixed order.
    pub fn entries(&self) -> Vec<(&'static str, &AestheticValue)> {
        [("x", &self.x), ("y", &self.y), ("color", &self.color), ("fill", &self.fill)]
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)))
            .collect()
    }
}

/// Value of an aesthetic: a column reference or a literal constant
#[derive(Debug, Clone, PartialEq)]
pub enum AestheticValue {
    Mapped(String),
    Text(String),
    Number(f64),
}

/// Geometry layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Connect rows in ascending x order
    Lines,
    /// Connect rows in data order
    Paths,
}
