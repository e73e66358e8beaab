// Tabular input data, row grouping and in-group sorting

use crate::error::{PlotError, Result};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// Opaque identifier of a group of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u32);

impl GroupId {
    /// The ungrouped whole.
    pub const ROOT: GroupId = GroupId(0);
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Group {
    id: GroupId,
    key: String,
    /// Indices into `Table::rows`, in traversal order.
    rows: Vec<usize>,
}

/// Immutable table of string cells partitioned into groups.
///
/// Operations that reorder or regroup rows return a new table; the row
/// storage itself is never rewritten, only each group's index list.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    groups: Vec<Group>,
}

impl Table {
    /// Create a table whose rows all belong to the root group.
    ///
    /// Every row must have exactly one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            return Err(PlotError::InvalidData(format!(
                "row {} has {} cells, expected {}",
                i + 1,
                row.len(),
                headers.len()
            )));
        }
        let root = Group {
            id: GroupId::ROOT,
            key: String::new(),
            rows: (0..rows.len()).collect(),
        };
        Ok(Self { headers, rows, groups: vec![root] })
    }

    /// Read a headed CSV document.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| PlotError::InvalidData(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(PlotError::InvalidData("CSV has no header row".to_string()));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| PlotError::InvalidData(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(headers, rows)
    }

    /// Create a table from a JSON array of objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| PlotError::InvalidData("input must be a JSON array of objects".to_string()))?;

        let Some(first) = array.first() else {
            return Err(PlotError::InvalidData("input array is empty".to_string()));
        };

        // Headers come from the first object
        let first_obj = first
            .as_object()
            .ok_or_else(|| PlotError::InvalidData("items in array must be objects".to_string()))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::new();
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| PlotError::InvalidData("items in array must be objects".to_string()))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => {
                        return Err(PlotError::InvalidData(format!(
                            "unsupported value type for field '{}'",
                            header
                        )))
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Total number of rows across all groups.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the named column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PlotError::UnknownColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Group identifiers in traversal order.
    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.iter().map(|g| g.id)
    }

    /// The sub-table for one group.
    pub fn group(&self, gid: GroupId) -> Option<GroupView<'_>> {
        self.groups
            .iter()
            .find(|g| g.id == gid)
            .map(|group| GroupView { table: self, group })
    }

    /// Return a copy whose rows are sorted ascending by `col` within each
    /// group. Ties keep their current relative order.
    pub fn sort_by(&self, col: &str) -> Result<Table> {
        let idx = self.column_index(col)?;
        let mut sorted = self.clone();
        for group in &mut sorted.groups {
            group
                .rows
                .sort_by(|&a, &b| compare_cells(&self.rows[a][idx], &self.rows[b][idx]));
        }
        Ok(sorted)
    }

    /// Return a copy in which every group is split by the distinct values of
    /// `col`. Keys are visited in sorted order; ids are reassigned.
    pub fn group_by(&self, col: &str) -> Result<Table> {
        let idx = self.column_index(col)?;
        let mut groups = Vec::new();
        let mut next_id = 1u32;

        for parent in &self.groups {
            let mut split: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
            for &row in &parent.rows {
                split.entry(self.rows[row][idx].as_str()).or_default().push(row);
            }
            for (value, rows) in split {
                let key = if parent.key.is_empty() {
                    value.to_string()
                } else {
                    format!("{}/{}", parent.key, value)
                };
                groups.push(Group { id: GroupId(next_id), key, rows });
                next_id += 1;
            }
        }

        Ok(Table {
            headers: self.headers.clone(),
            rows: self.rows.clone(),
            groups,
        })
    }
}

/// Borrowed view of the rows of one group.
#[derive(Debug, Clone, Copy)]
pub struct GroupView<'a> {
    table: &'a Table,
    group: &'a Group,
}

impl<'a> GroupView<'a> {
    pub fn id(&self) -> GroupId {
        self.group.id
    }

    /// Partition key, e.g. `"A"` or `"A/north"`; empty for the root group.
    pub fn key(&self) -> &'a str {
        &self.group.key
    }

    pub fn len(&self) -> usize {
        self.group.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group.rows.is_empty()
    }

    /// Indices of this group's rows in the underlying table.
    pub fn row_indices(&self) -> &'a [usize] {
        &self.group.rows
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [String]> + 'a {
        let (table, group) = (self.table, self.group);
        group.rows.iter().map(move |&r| table.rows[r].as_slice())
    }

    /// Cells of one column, in group order.
    pub fn column(&self, name: &str) -> Result<Vec<&'a str>> {
        let idx = self.table.column_index(name)?;
        Ok(self.rows().map(|row| row[idx].as_str()).collect())
    }
}

/// Numbers compare numerically and sort before text; text compares lexically.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
