// Values and the scales that map data values to visual ones

use crate::color::Color;
use crate::error::{PlotError, Result};
use std::fmt;

/// A single data or visual value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Color(Color),
}

impl Value {
    /// Interpret a table cell: numeric if it parses, text otherwise.
    pub fn from_cell(cell: &str) -> Value {
        match cell.trim().parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(cell.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Colors, plus text naming a color.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            Value::Text(s) => Color::parse(s),
            Value::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Color(c) => write!(f, "{}", c),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    Identity,
    Real,
    Color,
}

/// Maps values from a data domain into an output range.
pub trait Scaler: fmt::Debug + Send + Sync {
    fn kind(&self) -> ScaleKind;

    fn map(&self, value: &Value) -> Result<Value>;
}

/// Passes values through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityScale;

impl IdentityScale {
    pub fn new() -> Self {
        IdentityScale
    }
}

impl Scaler for IdentityScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Identity
    }

    fn map(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }
}

/// Continuous linear scale.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64), // Data min/max
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Fit a padded domain around the observed values. An empty input
    /// falls back to `[0, 1]`.
    pub fn fit<I: IntoIterator<Item = f64>>(values: I, range: (f64, f64)) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let domain = if min > max { (0.0, 1.0) } else { pad_range(min, max) };
        Self { domain, range }
    }
}

impl Scaler for LinearScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Real
    }

    fn map(&self, value: &Value) -> Result<Value> {
        let v = value
            .as_number()
            .ok_or_else(|| PlotError::ScaleDomain(format!("{} is not numeric", value)))?;
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return Ok(Value::Number((r0 + r1) / 2.0));
        }
        Ok(Value::Number(r0 + (v - d0) / (d1 - d0) * (r1 - r0)))
    }
}

/// Default categorical palette.
pub const PALETTE: [Color; 8] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
];

/// Maps discrete categories onto palette colors, cycling past the end.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalColorScale {
    categories: Vec<String>,
}

impl OrdinalColorScale {
    /// Categories keep first-seen order; duplicates are dropped.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = Vec::new();
        for c in categories {
            let c = c.into();
            if !seen.contains(&c) {
                seen.push(c);
            }
        }
        Self { categories: seen }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

impl Scaler for OrdinalColorScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Color
    }

    fn map(&self, value: &Value) -> Result<Value> {
        let key = match value {
            Value::Text(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Color(c) => return Ok(Value::Color(*c)),
        };
        let idx = self
            .categories
            .iter()
            .position(|c| *c == key)
            .ok_or_else(|| PlotError::ScaleDomain(format!("unknown category {:?}", key)))?;
        Ok(Value::Color(PALETTE[idx % PALETTE.len()]))
    }
}

pub(crate) fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passthrough() {
        let s = IdentityScale::new();
        assert_eq!(s.map(&Value::from("red")).unwrap(), Value::from("red"));
        assert_eq!(s.map(&Value::Number(3.5)).unwrap(), Value::Number(3.5));
        assert_eq!(s.kind(), ScaleKind::Identity);
    }

    #[test]
    fn test_from_cell() {
        assert_eq!(Value::from_cell("2.5"), Value::Number(2.5));
        assert_eq!(Value::from_cell("red"), Value::Text("red".to_string()));
    }

    #[test]
    fn test_linear_map() {
        let s = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(s.map(&Value::Number(5.0)).unwrap(), Value::Number(50.0));
        assert!(matches!(s.map(&Value::from("x")), Err(PlotError::ScaleDomain(_))));
    }

    #[test]
    fn test_linear_fit_pads() {
        let s = LinearScale::fit(vec![0.0, 10.0], (0.0, 1.0));
        assert!(s.domain.0 < 0.0);
        assert!(s.domain.1 > 10.0);
    }

    #[test]
    fn test_linear_fit_single_point() {
        let s = LinearScale::fit(vec![5.0], (0.0, 1.0));
        assert_eq!(s.domain, (4.0, 6.0));
    }

    #[test]
    fn test_ordinal_color() {
        let s = OrdinalColorScale::new(["b", "a", "b"]);
        assert_eq!(s.categories(), &["b".to_string(), "a".to_string()]);
        assert_eq!(s.map(&Value::from("a")).unwrap(), Value::Color(PALETTE[1]));
        assert!(matches!(s.map(&Value::from("z")), Err(PlotError::ScaleDomain(_))));
    }

    #[test]
    fn test_as_color() {
        assert_eq!(Value::from("blue").as_color(), Some(Color::BLUE));
        assert_eq!(Value::Number(1.0).as_color(), None);
    }
}
