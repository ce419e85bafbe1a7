//! Output tables, schema conversion and chunking

use crate::{
    consts::ELECTRON_PID,
    error::{Error, Result},
    units::{energy_factor, length_factor},
};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    F64(Vec<f64>),
    I64(Vec<i64>),
}

impl ColumnData {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            ColumnData::F64(v) => v.len(),
            ColumnData::I64(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::F64(_) => "f64",
            ColumnData::I64(_) => "i64",
        }
    }

    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            ColumnData::F64(v) => v.clone(),
            ColumnData::I64(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }

    pub fn to_i64(&self) -> Vec<i64> {
        match self {
            ColumnData::F64(v) => v.iter().map(|&x| x.round() as i64).collect(),
            ColumnData::I64(v) => v.clone(),
        }
    }

    fn extend(&mut self, other: &ColumnData) -> Result<()> {
        match (self, other) {
            (ColumnData::F64(a), ColumnData::F64(b)) => a.extend_from_slice(b),
            (ColumnData::I64(a), ColumnData::I64(b)) => a.extend_from_slice(b),
            (a, b) => {
                return Err(Error::invalid(format!(
                    "cannot append {} data to a {} column",
                    b.type_name(),
                    a.type_name()
                )));
            }
        }
        Ok(())
    }
}

/// Named column with an optional physical-unit tag
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub unit: Option<String>,
    pub data: ColumnData,
}

impl Column {
    pub fn f64(name: &str, data: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            unit: None,
            data: ColumnData::F64(data),
        }
    }

    pub fn i64(name: &str, data: Vec<i64>) -> Self {
        Self {
            name: name.to_string(),
            unit: None,
            data: ColumnData::I64(data),
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }
}

/// Rectangular table of named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking for equal column lengths and unique names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let rows = first.data.len();
            for c in &columns {
                if c.data.len() != rows {
                    return Err(Error::LengthMismatch {
                        what: "table column",
                        expected: rows,
                        found: c.data.len(),
                    });
                }
            }
        }
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].iter().any(|o| o.name == c.name) {
                return Err(Error::invalid(format!("duplicate column '{}'", c.name)));
            }
        }
        Ok(Self { columns })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| Error::MissingField(name.to_string()))
    }

    /// Whether `other` has the same names, units and column types in order
    pub fn same_schema(&self, other: &Table) -> bool {
        self.columns.len() == other.columns.len()
            && self.columns.iter().zip(&other.columns).all(|(a, b)| {
                a.name == b.name && a.unit == b.unit && a.data.type_name() == b.data.type_name()
            })
    }

    /// Append the rows of `other`, which must share this table's schema.
    pub fn append(&mut self, other: &Table) -> Result<()> {
        if !self.same_schema(other) {
            return Err(Error::invalid(format!(
                "cannot append table with fields {:?} to fields {:?}",
                other.field_names(),
                self.field_names()
            )));
        }
        for (a, b) in self.columns.iter_mut().zip(&other.columns) {
            a.data.extend(&b.data)?;
        }
        Ok(())
    }
}

/// Output schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Vertex positions `xloc, yloc, zloc`
    Pos,
    /// Primary kinematics `px, py, pz, ekin, g4_pid`
    Kin,
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pos" => Ok(OutputMode::Pos),
            "kin" => Ok(OutputMode::Kin),
            _ => Err(Error::UnknownOutputMode(s.to_string())),
        }
    }
}

/// Map a raw sample table onto one of the two output schemas.
///
/// `pos` keeps `xloc, yloc, zloc` tagged with `lunit`; `kin` keeps
/// `px, py, pz, ekin` (only `ekin` tagged with `eunit`) and an integer
/// `g4_pid` column taken from `g4_pid` or `particle`, defaulting to
/// electrons when neither is present.
pub fn convert_output(arr: &Table, mode: OutputMode, lunit: &str, eunit: &str) -> Result<Table> {
    match mode {
        OutputMode::Pos => {
            length_factor(lunit)?;
            let cols = ["xloc", "yloc", "zloc"]
                .iter()
                .map(|&name| {
                    arr.require(name)
                        .map(|c| Column::f64(name, c.data.to_f64()).with_unit(lunit))
                })
                .collect::<Result<Vec<_>>>()?;
            Table::from_columns(cols)
        }
        OutputMode::Kin => {
            energy_factor(eunit)?;
            let mut cols = Vec::with_capacity(5);
            for name in ["px", "py", "pz"] {
                cols.push(Column::f64(name, arr.require(name)?.data.to_f64()));
            }
            cols.push(Column::f64("ekin", arr.require("ekin")?.data.to_f64()).with_unit(eunit));

            let pid = match arr.column("g4_pid").or_else(|| arr.column("particle")) {
                Some(c) => c.data.to_i64(),
                None => vec![ELECTRON_PID; arr.rows()],
            };
            cols.push(Column::i64("g4_pid", pid));
            Table::from_columns(cols)
        }
    }
}

/// Split `total` into chunks of at most `max_chunk` rows.
///
/// All chunks are full except possibly the last one.
pub fn chunk_sizes(total: usize, max_chunk: usize) -> Result<Vec<usize>> {
    if max_chunk == 0 {
        return Err(Error::invalid("chunk size must be positive"));
    }
    let full = total / max_chunk;
    let rest = total % max_chunk;
    let mut chunks = vec![max_chunk; full];
    if rest > 0 {
        chunks.push(rest);
    }
    Ok(chunks)
}
