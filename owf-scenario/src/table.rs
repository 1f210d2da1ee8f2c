use crate::error::{OwfError, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::warn;
use owf_utils::dates::parse_date;
use std::collections::{HashMap, HashSet};

/// One dated record of a scenario dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    values: HashMap<String, f64>,
}

impl TableRow {
    pub fn new(date: NaiveDate, values: HashMap<String, f64>) -> Self {
        TableRow { date, values }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// A time-indexed scenario dataset: dated rows of named numeric columns.
///
/// The first column of the delimited source holds the date, whatever its
/// header says. Column order is irrelevant; names are significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesTable {
    headers: HashSet<String>,
    rows: Vec<TableRow>,
}

impl TimeSeriesTable {
    /// An empty table, used when a dataset could not be retrieved.
    pub fn empty() -> Self {
        TimeSeriesTable::default()
    }

    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        let mut headers = HashSet::new();
        for row in &rows {
            headers.extend(row.values.keys().cloned());
        }
        TimeSeriesTable { headers, rows }
    }

    /// Parse a delimited dataset body.
    ///
    /// Cells that do not parse as numbers are skipped with a warning; an
    /// unparseable date is a hard error, since it means the body is not a
    /// scenario table at all.
    pub fn from_csv_str(body: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        let column_names: Vec<String> = rdr
            .headers()?
            .iter()
            .skip(1)
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows: Vec<TableRow> = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let date_cell = record.get(0).unwrap_or_default();
            let date = parse_date(date_cell)
                .map_err(|_| OwfError::DateParse(date_cell.to_string()))?;

            let mut values = HashMap::with_capacity(column_names.len());
            for (name, cell) in column_names.iter().zip(record.iter().skip(1)) {
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(value) => {
                        values.insert(name.clone(), value);
                    }
                    Err(_) => {
                        warn!("skipping non-numeric cell in column {name}: {cell:?}");
                    }
                }
            }
            rows.push(TableRow { date, values });
        }

        Ok(TimeSeriesTable {
            headers: column_names.into_iter().collect(),
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if the column appeared in the dataset header.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}
