//! Table sinks and the chunked write loop

use crate::{
    error::{Error, Result},
    output::{Column, ColumnData, Table, chunk_sizes},
    utils::perturb_seed,
};
use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace whatever is stored under the key
    Overwrite,
    /// Add rows to the existing dataset under the key
    Append,
}

impl WriteMode {
    /// First chunk overwrites, later chunks append
    #[inline]
    pub fn for_chunk(idx: usize) -> Self {
        if idx == 0 { Self::Overwrite } else { Self::Append }
    }
}

/// Destination for generated tables, addressed by a path-like key
pub trait TableSink {
    fn write(&mut self, table: &Table, key: &str, mode: WriteMode) -> Result<()>;
}

/// Keeps every dataset in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: BTreeMap<String, Table>,
}

impl MemorySink {
    pub fn get(&self, key: &str) -> Option<&Table> {
        self.tables.get(key)
    }
}

impl TableSink for MemorySink {
    fn write(&mut self, table: &Table, key: &str, mode: WriteMode) -> Result<()> {
        match mode {
            WriteMode::Overwrite => {
                self.tables.insert(key.to_string(), table.clone());
            }
            WriteMode::Append => match self.tables.get_mut(key) {
                Some(existing) => existing.append(table)?,
                None => {
                    return Err(Error::invalid(format!(
                        "cannot append to missing dataset '{}'",
                        key
                    )));
                }
            },
        }
        Ok(())
    }
}

/// Whitespace-delimited text file holding one dataset
///
/// Layout:
/// ```text
/// # key: vtx/pos
/// # columns: xloc:f64[mm] yloc:f64[mm] zloc:f64[mm]
/// 1.5 -2 30
/// ```
#[derive(Debug, Clone)]
pub struct TextSink {
    path: PathBuf,
}

impl TextSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn column_spec(c: &Column) -> String {
    match &c.unit {
        Some(u) => format!("{}:{}[{}]", c.name, c.data.type_name(), u),
        None => format!("{}:{}", c.name, c.data.type_name()),
    }
}

fn schema_line(table: &Table) -> String {
    let specs: Vec<String> = table.columns().iter().map(column_spec).collect();
    format!("# columns: {}", specs.join(" "))
}

fn write_rows(writer: &mut impl Write, table: &Table) -> Result<()> {
    let mut fields: Vec<String> = Vec::with_capacity(table.columns().len());
    for row in 0..table.rows() {
        fields.clear();
        for c in table.columns() {
            fields.push(match &c.data {
                ColumnData::F64(v) => v[row].to_string(),
                ColumnData::I64(v) => v[row].to_string(),
            });
        }
        writeln!(writer, "{}", fields.join(" "))?;
    }
    Ok(())
}

impl TableSink for TextSink {
    fn write(&mut self, table: &Table, key: &str, mode: WriteMode) -> Result<()> {
        match mode {
            WriteMode::Overwrite => {
                let mut writer = BufWriter::new(File::create(&self.path)?);
                writeln!(writer, "# key: {}", key)?;
                writeln!(writer, "{}", schema_line(table))?;
                write_rows(&mut writer, table)?;
                writer.flush()?;
            }
            WriteMode::Append => {
                let mut lines = BufReader::new(File::open(&self.path)?).lines();
                let stored_key = lines.next().transpose()?.unwrap_or_default();
                let stored_schema = lines.next().transpose()?.unwrap_or_default();
                if stored_key != format!("# key: {}", key) || stored_schema != schema_line(table) {
                    return Err(Error::invalid(format!(
                        "cannot append '{}' to {}: dataset or schema differs",
                        key,
                        self.path.display()
                    )));
                }
                let file = OpenOptions::new().append(true).open(&self.path)?;
                let mut writer = BufWriter::new(file);
                write_rows(&mut writer, table)?;
                writer.flush()?;
            }
        }
        debug!(path = %self.path.display(), key, rows = table.rows(), ?mode, "wrote table");
        Ok(())
    }
}

fn parse_column_spec(spec: &str, line: usize) -> Result<Column> {
    let parse_err = || Error::Parse {
        line,
        message: format!("bad column spec '{}'", spec),
    };
    let (name, rest) = spec.split_once(':').ok_or_else(parse_err)?;
    let (ty, unit) = match rest.split_once('[') {
        Some((ty, u)) => (ty, Some(u.strip_suffix(']').ok_or_else(parse_err)?)),
        None => (rest, None),
    };
    let column = match ty {
        "f64" => Column::f64(name, Vec::new()),
        "i64" => Column::i64(name, Vec::new()),
        _ => return Err(parse_err()),
    };
    Ok(match unit {
        Some(u) => column.with_unit(u),
        None => column,
    })
}

/// Read back a file written by [`TextSink`], returning its key and table.
pub fn read_text_table(path: impl AsRef<Path>) -> Result<(String, Table)> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut key = None;
    let mut columns: Vec<Column> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        if let Some(k) = line.strip_prefix("# key: ") {
            key = Some(k.to_string());
            continue;
        }
        if let Some(specs) = line.strip_prefix("# columns: ") {
            columns = specs
                .split_whitespace()
                .map(|s| parse_column_spec(s, lineno))
                .collect::<Result<_>>()?;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != columns.len() {
            return Err(Error::Parse {
                line: lineno,
                message: format!("expected {} fields, found {}", columns.len(), fields.len()),
            });
        }
        for (Column { name, data, .. }, f) in columns.iter_mut().zip(fields) {
            let bad = |e: &dyn std::fmt::Display| Error::Parse {
                line: lineno,
                message: format!("column '{}': {}", name, e),
            };
            match data {
                ColumnData::F64(v) => v.push(f.parse().map_err(|e| bad(&e))?),
                ColumnData::I64(v) => v.push(f.parse().map_err(|e| bad(&e))?),
            }
        }
    }

    let key = key.ok_or_else(|| Error::Parse {
        line: 1,
        message: "missing '# key:' header".into(),
    })?;
    Ok((key, Table::from_columns(columns)?))
}

/// Generate `total` rows in chunks and stream them into `sink` under `key`.
///
/// `generate(chunk, seed)` must return exactly `chunk` rows. The seed is
/// stepped by [`perturb_seed`] between chunks so every chunk draws a
/// different stream. A `total` of zero still overwrites `key` with an
/// empty table.
pub fn write_chunked<S, F>(
    total: usize,
    max_chunk: usize,
    seed: u64,
    sink: &mut S,
    key: &str,
    mut generate: F,
) -> Result<()>
where
    S: TableSink + ?Sized,
    F: FnMut(usize, u64) -> Result<Table>,
{
    let mut chunks = chunk_sizes(total, max_chunk)?;
    if chunks.is_empty() {
        chunks.push(0);
    }
    let mut seed = seed;

    for (idx, &chunk) in chunks.iter().enumerate() {
        let table = generate(chunk, seed)?;
        if table.rows() != chunk {
            return Err(Error::LengthMismatch {
                what: "generated chunk",
                expected: chunk,
                found: table.rows(),
            });
        }
        debug!(chunk = idx, rows = chunk, seed, "generated chunk");

        sink.write(&table, key, WriteMode::for_chunk(idx))?;
        seed = perturb_seed(seed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Column;

    fn counting_table(n: usize, start: i64) -> Table {
        Table::from_columns(vec![
            Column::i64("n", (start..start + n as i64).collect()),
            Column::f64("e", vec![0.5; n]).with_unit("keV"),
        ])
        .unwrap()
    }

    #[test]
    fn chunked_memory_writes_overwrite_then_append() {
        let mut sink = MemorySink::default();
        sink.write(&counting_table(3, 100), "vtx/pos", WriteMode::Overwrite)
            .unwrap();

        let mut seeds = Vec::new();
        write_chunked(10, 4, 3, &mut sink, "vtx/pos", |n, seed| {
            seeds.push(seed);
            Ok(counting_table(n, 0))
        })
        .unwrap();

        // stale rows from the earlier write are gone
        assert_eq!(sink.get("vtx/pos").unwrap().rows(), 10);
        assert_eq!(seeds, vec![3, 22, 155]);
    }

    #[test]
    fn chunk_with_wrong_length_is_rejected() {
        let mut sink = MemorySink::default();
        let res = write_chunked(5, 5, 1, &mut sink, "k", |n, _| Ok(counting_table(n - 1, 0)));
        assert!(matches!(res, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn seed_zero_chunks_get_distinct_seeds() {
        let mut sink = MemorySink::default();
        let mut seeds = Vec::new();
        write_chunked(9, 3, 0, &mut sink, "k", |n, seed| {
            seeds.push(seed);
            Ok(counting_table(n, 0))
        })
        .unwrap();
        assert_eq!(seeds, vec![0, 1, 8]);
    }

    #[test]
    fn zero_rows_replace_the_dataset() {
        let mut sink = MemorySink::default();
        write_chunked(5, 2, 1, &mut sink, "vtx/pos", |n, _| Ok(counting_table(n, 0))).unwrap();
        assert_eq!(sink.get("vtx/pos").unwrap().rows(), 5);

        let mut calls = 0;
        write_chunked(0, 2, 1, &mut sink, "vtx/pos", |n, _| {
            calls += 1;
            Ok(counting_table(n, 0))
        })
        .unwrap();
        assert_eq!(calls, 1);
        let table = sink.get("vtx/pos").unwrap();
        assert_eq!(table.rows(), 0);
        assert_eq!(table.field_names(), vec!["n", "e"]);
    }

    #[test]
    fn append_without_dataset_fails() {
        let mut sink = MemorySink::default();
        assert!(sink.write(&counting_table(1, 0), "k", WriteMode::Append).is_err());
    }

    #[test]
    fn text_sink_round_trip() {
        let path = std::env::temp_dir().join(format!("revertex-sink-{}.dat", std::process::id()));
        let mut sink = TextSink::new(&path);
        write_chunked(7, 3, 9, &mut sink, "vtx/kin", |n, _| Ok(counting_table(n, 0))).unwrap();

        let (key, table) = read_text_table(&path).unwrap();
        assert_eq!(key, "vtx/kin");
        assert_eq!(table.rows(), 7);
        assert_eq!(
            table.column("n").unwrap().data,
            ColumnData::I64(vec![0, 1, 2, 0, 1, 2, 0])
        );
        assert_eq!(table.column("e").unwrap().unit.as_deref(), Some("keV"));

        // appending a different schema is refused
        let other = Table::from_columns(vec![Column::f64("x", vec![1.0])]).unwrap();
        assert!(sink.write(&other, "vtx/kin", WriteMode::Append).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
