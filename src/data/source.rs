//! Table sources
//!
//! The pipeline only needs one capability from storage: "give me your tables".
//! `SqliteReader` materializes every user table of a database file and
//! `CsvReader` reads a single CSV file with a header row.

use crate::data::error::{PipelineError, PipelineResult};
use crate::data::table::{Table, Value};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Storage reader capability
pub trait TableReader {
    /// Read every table this source holds, fully materialized
    fn read_tables(&self) -> PipelineResult<Vec<Table>>;
}

/// Reads all tables from a SQLite database file (read-only)
#[derive(Debug, Clone)]
pub struct SqliteReader {
    path: PathBuf,
}

impl SqliteReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List user table names, sorted
    fn list_tables(conn: &Connection) -> PipelineResult<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Materialize one table with `SELECT *`
    fn read_table(conn: &Connection, name: &str) -> PipelineResult<Table> {
        let sql = format!("SELECT * FROM \"{}\"", name.replace('"', "\"\""));
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut table = Table::new(name, columns);
        let mut rows = stmt.query([])?;
        let mut row_number = 0;
        while let Some(row) = rows.next()? {
            row_number += 1;
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                let cell = match row.get_ref(i)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(v) => Value::Integer(v),
                    ValueRef::Real(v) => Value::Real(v),
                    ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                        Ok(text) => Value::from(text),
                        Err(e) => {
                            return Err(PipelineError::StorageFormat(format!(
                                "invalid UTF-8 text: table `{}` row {} column `{}`: {}",
                                name,
                                row_number,
                                table.columns[i],
                                e
                            )));
                        }
                    },
                    ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
                };
                cells.push(cell);
            }
            table.push_row(cells)?;
        }

        Ok(table)
    }
}

impl TableReader for SqliteReader {
    fn read_tables(&self) -> PipelineResult<Vec<Table>> {
        if !self.path.is_file() {
            return Err(PipelineError::StorageNotFound(self.path.clone()));
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let names = Self::list_tables(&conn)?;
        if names.is_empty() {
            return Err(PipelineError::StorageFormat(format!(
                "no tables found in {:?}",
                self.path
            )));
        }

        let tables = names
            .iter()
            .map(|name| Self::read_table(&conn, name))
            .collect::<PipelineResult<Vec<_>>>()?;

        // Release the file before handing the tables back
        conn.close().map_err(|(_, e)| PipelineError::from(e))?;

        tracing::debug!("Read {} tables from {:?}", tables.len(), self.path);
        Ok(tables)
    }
}

/// Reads one CSV file from a data directory
#[derive(Debug, Clone)]
pub struct CsvReader {
    dir: PathBuf,
    file_name: String,
    has_header: bool,
}

impl CsvReader {
    /// Create a reader for `dir/file_name`
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            has_header: true,
        }
    }

    /// Set whether the CSV has a header row; without one, columns are `column_N`
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Table name: the file stem
    fn table_name(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file_name.clone())
    }

    /// Read a CSV table from any reader (useful for testing)
    pub fn read_from<R: std::io::Read>(&self, source: R) -> PipelineResult<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .from_reader(source);

        let mut columns: Vec<String> = if self.has_header {
            reader
                .headers()?
                .iter()
                .map(|h| h.trim().to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if !self.has_header && columns.is_empty() {
                columns = (0..record.len()).map(|i| format!("column_{}", i)).collect();
            }
            rows.push(record.iter().map(Value::infer).collect::<Vec<_>>());
        }

        if columns.iter().all(|c| c.is_empty()) {
            return Err(PipelineError::StorageFormat(format!(
                "no columns found in {:?}",
                self.path()
            )));
        }

        let mut table = Table::new(self.table_name(), columns);
        for row in rows {
            table.push_row(row)?;
        }

        Ok(table)
    }
}

impl TableReader for CsvReader {
    fn read_tables(&self) -> PipelineResult<Vec<Table>> {
        if !self.dir.is_dir() {
            return Err(PipelineError::StorageNotFound(self.dir.clone()));
        }
        let path = self.path();
        if !path.is_file() {
            return Err(PipelineError::StorageNotFound(path));
        }

        let file = std::fs::File::open(&path)?;
        let table = self.read_from(std::io::BufReader::new(file))?;
        tracing::debug!("Read {} rows from {:?}", table.height(), path);
        Ok(vec![table])
    }
}
