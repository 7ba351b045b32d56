use super::aliases::TableKind;
use super::normalizer::normalize_header;
use super::row::Row;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Errors raised by data access adapters.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("failed to read table '{table}': {source}")]
    Io {
        table: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data in table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },
    #[error("unknown table '{0}'")]
    UnknownTable(String),
}

/// Data access collaborator that materializes battlefield tables as ordered rows.
pub trait DataSource: Send + Sync {
    fn load_table(&self, name: &str) -> Result<Vec<Row>, DataSourceError>;

    fn load_all(&self) -> Result<BTreeMap<String, Vec<Row>>, DataSourceError> {
        let mut tables = BTreeMap::new();
        for kind in TableKind::all() {
            let rows = self.load_table(kind.canonical_name())?;
            tables.insert(kind.canonical_name().to_string(), rows);
        }
        Ok(tables)
    }
}

/// Tables held in memory, keyed by any of their accepted names.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTables {
    tables: BTreeMap<TableKind, Vec<Row>>,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, kind: TableKind, rows: Vec<Row>) -> Self {
        self.insert(kind, rows);
        self
    }

    pub fn insert(&mut self, kind: TableKind, rows: Vec<Row>) {
        self.tables.insert(kind, rows);
    }
}

impl DataSource for InMemoryTables {
    fn load_table(&self, name: &str) -> Result<Vec<Row>, DataSourceError> {
        let kind =
            TableKind::from_name(name).ok_or_else(|| DataSourceError::UnknownTable(name.to_string()))?;
        Ok(self.tables.get(&kind).cloned().unwrap_or_default())
    }
}

/// Directory of `<table>.csv` files; any alias of a table name is accepted as file stem.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, kind: TableKind) -> Result<Option<PathBuf>, DataSourceError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| DataSourceError::Io {
            table: kind.canonical_name().to_string(),
            source,
        })?;

        let mut candidates = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !is_csv {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if TableKind::from_name(stem) == Some(kind) {
                candidates.push(path);
            }
        }

        // Canonical file wins over aliases when both exist.
        candidates.sort_by_key(|path| {
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(normalize_header)
                .unwrap_or_default();
            (stem != kind.canonical_name(), path.clone())
        });
        Ok(candidates.into_iter().next())
    }
}

impl DataSource for CsvDirectory {
    fn load_table(&self, name: &str) -> Result<Vec<Row>, DataSourceError> {
        let kind =
            TableKind::from_name(name).ok_or_else(|| DataSourceError::UnknownTable(name.to_string()))?;
        let Some(path) = self.locate(kind)? else {
            return Ok(Vec::new());
        };
        let file = std::fs::File::open(&path).map_err(|source| DataSourceError::Io {
            table: kind.canonical_name().to_string(),
            source,
        })?;
        parse_rows(file).map_err(|source| DataSourceError::Csv {
            table: kind.canonical_name().to_string(),
            source,
        })
    }
}

/// Parse CSV text with a header line into rows. Short records are padded with blanks.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<Row>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                (
                    header.to_string(),
                    record.get(index).unwrap_or_default().to_string(),
                )
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_rows_keeps_headers_and_pads_short_records() {
        let rows = parse_rows(Cursor::new("axis_id,axis_name,총거리\nAXIS01, 서부축 ,12\nAXIS02\n"))
            .expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["axis_name"], "서부축");
        assert_eq!(rows[1]["총거리"], "");
    }

    #[test]
    fn in_memory_tables_answer_alias_names() {
        let mut row = Row::new();
        row.insert("axis_id".to_string(), "AXIS01".to_string());
        let tables = InMemoryTables::new().with_table(TableKind::Axes, vec![row]);

        assert_eq!(tables.load_table("전장축선").expect("load").len(), 1);
        assert!(tables.load_table("missions").expect("load").is_empty());
        match tables.load_table("nonsense") {
            Err(DataSourceError::UnknownTable(name)) => assert_eq!(name, "nonsense"),
            other => panic!("expected unknown table error, got {other:?}"),
        }
    }

    #[test]
    fn load_all_returns_every_canonical_table() {
        let tables = InMemoryTables::new().load_all().expect("load all");
        assert_eq!(tables.len(), TableKind::all().len());
        assert!(tables.contains_key("threat_types"));
    }

    #[test]
    fn csv_directory_propagates_missing_directory_as_io_error() {
        let source = CsvDirectory::new("./does-not-exist");
        match source.load_table("axes") {
            Err(DataSourceError::Io { table, .. }) => assert_eq!(table, "axes"),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
