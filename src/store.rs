//! An in memory tournament store.
//!
//! A [`Database`] is a list of named [`Table`]s. Every table has a fixed list of
//! typed columns and holds its rows in the column order. Values written through
//! [`Table::insert`] and [`Table::update`] are converted to the column type, or
//! rejected.
//!
//! The whole database is read from and written to disk in one go, as postcard
//! or, for files ending in `.ron`, as RON.

use std::{fmt, fs, path::Path};

use anyhow::Context;
use chrono::NaiveDate;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DATE_FORMAT;

/// A row that is still being put together, keyed by column name.
pub type NamedRow = FxHashMap<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store: table {0} not found")]
    MissingTable(String),
    #[error("store: table {table} has no column {column}")]
    MissingColumn { table: String, column: String },
    #[error("store: table {table} has no row {row}")]
    MissingRow { table: String, row: usize },
    #[error("store: column {column} holds {expected} values, not '{value}'")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        value: Value,
    },
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ColumnType {
    Bool,
    Date,
    Float,
    Int,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "integer"),
            Self::Text => write!(f, "text"),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Date(NaiveDate),
    Float(f64),
    Int(i64),
    Text(String),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == Self::Null
    }

    /// Null, or text that is only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(int) => Some(*int),
            Self::Float(float) => float_to_int(*float),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn coerce(&self, kind: ColumnType) -> Option<Self> {
        match (kind, self) {
            (_, Self::Null) => Some(Self::Null),
            (ColumnType::Text, value) => Some(Self::Text(value.to_string())),
            (ColumnType::Bool, Self::Bool(boolean)) => Some(Self::Bool(*boolean)),
            (ColumnType::Bool, Self::Int(int)) => Some(Self::Bool(*int != 0)),
            (ColumnType::Bool, Self::Text(text)) => text.trim().parse().ok().map(Self::Bool),
            (ColumnType::Date, Self::Date(date)) => Some(Self::Date(*date)),
            (ColumnType::Date, Self::Text(text)) => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
                .ok()
                .map(Self::Date),
            (ColumnType::Float, Self::Float(float)) => Some(Self::Float(*float)),
            (ColumnType::Float, Self::Int(int)) => Some(Self::Float(*int as f64)),
            (ColumnType::Float, Self::Text(text)) => text.trim().parse().ok().map(Self::Float),
            (ColumnType::Int, Self::Bool(boolean)) => Some(Self::Int(i64::from(*boolean))),
            (ColumnType::Int, Self::Float(float)) => float_to_int(*float).map(Self::Int),
            (ColumnType::Int, Self::Int(int)) => Some(Self::Int(*int)),
            (ColumnType::Int, Self::Text(text)) => text.trim().parse().ok().map(Self::Int),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(boolean) => write!(f, "{boolean}"),
            Self::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::Float(float) => write!(f, "{float}"),
            Self::Int(int) => write!(f, "{int}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn float_to_int(float: f64) -> Option<i64> {
    // 2^63, the first float past i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    (float.fract() == 0.0 && (-LIMIT..LIMIT).contains(&float)).then_some(float as i64)
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

impl Column {
    #[must_use]
    pub fn new(name: &str, kind: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Row(Vec<Value>);

impl Row {
    #[must_use]
    pub fn get(&self, column: usize) -> Option<&Value> {
        self.0.get(column)
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub fn new(name: &str, columns: Vec<Column>) -> Self {
        Self {
            name: name.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    /// # Errors
    ///
    /// If the table has no such column.
    pub fn require_column(&self, column: &str) -> Result<usize, StoreError> {
        self.column_index(column)
            .ok_or_else(|| StoreError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// The value of `column` in `row`, or `None` if the table has no such column.
    #[must_use]
    pub fn value<'a>(&self, row: &'a Row, column: &str) -> Option<&'a Value> {
        row.get(self.column_index(column)?)
    }

    /// Appends a row, laying `values` out in the table's column order.
    ///
    /// Columns missing from `values` are left null and names the table has
    /// no column for are skipped.
    ///
    /// # Errors
    ///
    /// If a value can't be stored in its column.
    pub fn insert(&mut self, values: &NamedRow) -> Result<(), StoreError> {
        for name in values.keys() {
            if self.column_index(name).is_none() {
                debug!("{}: no column {name}, skipping it", self.name);
            }
        }

        let row = self
            .columns
            .iter()
            .map(|column| match values.get(&column.name) {
                Some(value) => coerce(column, value),
                None => Ok(Value::Null),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.rows.push(Row(row));
        Ok(())
    }

    /// Overwrites one value of an existing row.
    ///
    /// # Errors
    ///
    /// If the row or column doesn't exist, or the value can't be stored in the
    /// column.
    pub fn update(&mut self, row: usize, column: &str, value: &Value) -> Result<(), StoreError> {
        let index = self.require_column(column)?;
        let value = self
            .columns
            .get(index)
            .map(|column| coerce(column, value))
            .transpose()?
            .unwrap_or_default();

        let cell = self
            .rows
            .get_mut(row)
            .and_then(|row| row.0.get_mut(index))
            .ok_or_else(|| StoreError::MissingRow {
                table: self.name.clone(),
                row,
            })?;

        *cell = value;
        Ok(())
    }

    /// Removes every row `delete` returns true for and returns how many went.
    pub fn delete_where<F: FnMut(&Row) -> bool>(&mut self, mut delete: F) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !delete(row));
        before - self.rows.len()
    }
}

fn coerce(column: &Column, value: &Value) -> Result<Value, StoreError> {
    value
        .coerce(column.kind)
        .ok_or_else(|| StoreError::TypeMismatch {
            column: column.name.clone(),
            expected: column.kind,
            value: value.clone(),
        })
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum StoreFormat {
    Postcard,
    Ron,
}

impl StoreFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("ron") => Self::Ron,
            _ => Self::Postcard,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Database {
    tables: Vec<Table>,
}

impl Database {
    #[must_use]
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// # Errors
    ///
    /// If there is no such table.
    pub fn table(&self, name: &str) -> Result<&Table, StoreError> {
        self.tables
            .iter()
            .find(|table| table.name == name)
            .ok_or_else(|| StoreError::MissingTable(name.to_string()))
    }

    /// # Errors
    ///
    /// If there is no such table.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table, StoreError> {
        self.tables
            .iter_mut()
            .find(|table| table.name == name)
            .ok_or_else(|| StoreError::MissingTable(name.to_string()))
    }

    /// # Errors
    ///
    /// If the file can't be read or decoded.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let database = match StoreFormat::from_path(path) {
            StoreFormat::Postcard => {
                let data = fs::read(path)
                    .with_context(|| format!("failed to read store: {}", path.display()))?;
                postcard::from_bytes(&data)
                    .with_context(|| format!("postcard: {}", path.display()))?
            }
            StoreFormat::Ron => {
                let string = fs::read_to_string(path)
                    .with_context(|| format!("failed to read store: {}", path.display()))?;
                ron::from_str(&string).with_context(|| format!("RON: {}", path.display()))?
            }
        };

        debug!("loaded store {}", path.display());
        Ok(database)
    }

    /// # Errors
    ///
    /// If the database can't be encoded or the file can't be written.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let data = match StoreFormat::from_path(path) {
            StoreFormat::Postcard => postcard::to_allocvec(self)?,
            StoreFormat::Ron => {
                ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?.into_bytes()
            }
        };

        fs::write(path, data)
            .with_context(|| format!("failed to write store: {}", path.display()))?;

        debug!("saved store {}", path.display());
        Ok(())
    }
}
