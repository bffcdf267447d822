//! # Series
//!
//! $$
//! r_t = \frac{P_t}{P_{t-1}} - 1,\qquad t = t_0, t_0 + 1, \dots
//! $$
//!
//! Time-indexed return series and tables on a regular monthly index.
//!
//! A [`Series`] is a single named column, a [`Table`] is a set of named
//! columns sharing one index. Statistics that apply to one column are lifted
//! to every column of a table through [`Returns::aggregate`].

use std::collections::HashSet;
use std::fmt::Display;

use chrono::Datelike;
use chrono::NaiveDate;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::Axis;

use crate::error::Result;
use crate::error::RiskKitError;

/// A calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
  year: i32,
  month: u32,
}

impl Period {
  pub fn new(year: i32, month: u32) -> Result<Self> {
    if !(1..=12).contains(&month) {
      return Err(RiskKitError::invalid(format!("month {month} out of range")));
    }
    Ok(Self { year, month })
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn month(&self) -> u32 {
    self.month
  }

  /// Parse a `YYYYMM` label such as `192607`.
  pub fn parse_yyyymm(s: &str) -> Result<Self> {
    let s = s.trim();
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
      return Err(RiskKitError::invalid(format!("'{s}' is not a YYYYMM period")));
    }
    let year = s[..4]
      .parse::<i32>()
      .map_err(|e| RiskKitError::invalid(e.to_string()))?;
    let month = s[4..]
      .parse::<u32>()
      .map_err(|e| RiskKitError::invalid(e.to_string()))?;
    Self::new(year, month)
  }

  /// Parse a calendar date (`%Y-%m-%d` or `%d/%m/%Y`) into its month.
  pub fn parse_date(s: &str) -> Result<Self> {
    let s = s.trim();
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
      .map_err(|e| RiskKitError::invalid(format!("'{s}' is not a date: {e}")))?;
    Ok(Self::from(date))
  }

  /// The period `n` months later.
  pub fn offset(&self, n: usize) -> Self {
    let months = self.year as i64 * 12 + (self.month as i64 - 1) + n as i64;
    Self {
      year: months.div_euclid(12) as i32,
      month: months.rem_euclid(12) as u32 + 1,
    }
  }

  pub fn succ(&self) -> Self {
    self.offset(1)
  }
}

impl From<NaiveDate> for Period {
  fn from(date: NaiveDate) -> Self {
    Self {
      year: date.year(),
      month: date.month(),
    }
  }
}

impl Display for Period {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

/// Regular monthly index: `len` consecutive periods starting at `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodIndex {
  pub start: Period,
  pub len: usize,
}

impl PeriodIndex {
  pub fn new(start: Period, len: usize) -> Self {
    Self { start, len }
  }

  /// Build an index from explicit periods, rejecting gaps and reordering.
  pub fn from_periods(periods: &[Period]) -> Result<Self> {
    let start = *periods
      .first()
      .ok_or_else(|| RiskKitError::invalid("empty period index"))?;
    for (i, pair) in periods.windows(2).enumerate() {
      if pair[1] != pair[0].succ() {
        return Err(RiskKitError::invalid(format!(
          "period index is not regular monthly: {} follows {} at row {}",
          pair[1],
          pair[0],
          i + 1
        )));
      }
    }
    Ok(Self::new(start, periods.len()))
  }

  pub fn get(&self, i: usize) -> Option<Period> {
    (i < self.len).then(|| self.start.offset(i))
  }

  pub fn iter(&self) -> impl Iterator<Item = Period> + '_ {
    (0..self.len).map(|i| self.start.offset(i))
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }
}

/// A single named return series.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
  pub name: String,
  pub index: PeriodIndex,
  pub values: Array1<f64>,
}

impl Series {
  pub fn new(name: impl Into<String>, start: Period, values: Array1<f64>) -> Self {
    let index = PeriodIndex::new(start, values.len());
    Self {
      name: name.into(),
      index,
      values,
    }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// View as a one-column table.
  pub fn to_table(&self) -> Table {
    Table {
      columns: vec![self.name.clone()],
      index: self.index,
      values: self.values.clone().insert_axis(Axis(1)),
    }
  }
}

/// Named columns sharing one monthly index; rows are periods.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
  columns: Vec<String>,
  index: PeriodIndex,
  values: Array2<f64>,
}

impl Table {
  pub fn new(columns: Vec<String>, start: Period, values: Array2<f64>) -> Result<Self> {
    if values.ncols() != columns.len() {
      return Err(RiskKitError::shape(
        "table columns",
        columns.len(),
        values.ncols(),
      ));
    }
    let mut seen = HashSet::with_capacity(columns.len());
    for c in &columns {
      if !seen.insert(c.as_str()) {
        return Err(RiskKitError::invalid(format!("duplicate column '{c}'")));
      }
    }
    let index = PeriodIndex::new(start, values.nrows());
    Ok(Self {
      columns,
      index,
      values,
    })
  }

  /// Build a table shaped like `other` (same index and columns) with new values.
  pub fn like(other: &Table, values: Array2<f64>) -> Result<Self> {
    if values.dim() != other.values.dim() {
      return Err(RiskKitError::shape(
        "table cells",
        other.values.len(),
        values.len(),
      ));
    }
    Ok(Self {
      columns: other.columns.clone(),
      index: other.index,
      values,
    })
  }

  pub fn columns(&self) -> &[String] {
    &self.columns
  }

  pub fn index(&self) -> PeriodIndex {
    self.index
  }

  pub fn values(&self) -> &Array2<f64> {
    &self.values
  }

  pub fn nrows(&self) -> usize {
    self.values.nrows()
  }

  pub fn ncols(&self) -> usize {
    self.values.ncols()
  }

  pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
    self
      .columns
      .iter()
      .position(|c| c == name)
      .map(|j| self.values.column(j))
  }

  /// Extract a single column as a series.
  pub fn series(&self, name: &str) -> Result<Series> {
    let col = self
      .column(name)
      .ok_or_else(|| RiskKitError::invalid(format!("unknown column '{name}'")))?;
    Ok(Series {
      name: name.to_string(),
      index: self.index,
      values: col.to_owned(),
    })
  }

  /// Keep only the named columns, in the order given.
  pub fn select(&self, names: &[&str]) -> Result<Self> {
    let mut cols = Vec::with_capacity(names.len());
    for name in names {
      let j = self
        .columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| RiskKitError::invalid(format!("unknown column '{name}'")))?;
      cols.push(j);
    }
    Self::new(
      names.iter().map(|s| s.to_string()).collect(),
      self.index.start,
      self.values.select(Axis(1), &cols),
    )
  }

  /// Same data under new column names.
  pub fn with_columns(self, columns: Vec<String>) -> Result<Self> {
    Self::new(columns, self.index.start, self.values)
  }

  /// Rows `from..to` (exclusive), keeping the index aligned.
  pub fn slice_rows(&self, from: usize, to: usize) -> Result<Self> {
    if from > to || to > self.nrows() {
      return Err(RiskKitError::invalid(format!(
        "row range {from}..{to} outside 0..{}",
        self.nrows()
      )));
    }
    Ok(Self {
      columns: self.columns.clone(),
      index: PeriodIndex::new(self.index.start.offset(from), to - from),
      values: self.values.slice(ndarray::s![from..to, ..]).to_owned(),
    })
  }

  /// Row position of `period`, if covered by the index.
  pub fn position(&self, period: Period) -> Option<usize> {
    self.index.iter().position(|p| p == period)
  }
}

/// Whether a statistic was computed on one series or on every column of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
  Series,
  Table,
}

/// Input to the statistics layer: a single series or a table of series.
#[derive(Clone, Copy, Debug)]
pub enum Returns<'a> {
  Series(&'a Series),
  Table(&'a Table),
}

impl<'a> From<&'a Series> for Returns<'a> {
  fn from(s: &'a Series) -> Self {
    Returns::Series(s)
  }
}

impl<'a> From<&'a Table> for Returns<'a> {
  fn from(t: &'a Table) -> Self {
    Returns::Table(t)
  }
}

impl Returns<'_> {
  pub fn shape(&self) -> Shape {
    match self {
      Returns::Series(_) => Shape::Series,
      Returns::Table(_) => Shape::Table,
    }
  }

  /// Apply a single-series function to the series, or to every column.
  pub fn aggregate<T, F>(&self, f: F) -> Statistic<T>
  where
    F: Fn(ArrayView1<f64>) -> T,
  {
    match self {
      Returns::Series(s) => Statistic::Scalar(f(s.values.view())),
      Returns::Table(t) => Statistic::PerColumn(
        t.columns
          .iter()
          .zip(t.values.columns())
          .map(|(name, col)| (name.clone(), f(col)))
          .collect(),
      ),
    }
  }
}

/// Output of a statistic: one value, or one value per column.
#[derive(Clone, Debug, PartialEq)]
pub enum Statistic<T = f64> {
  Scalar(T),
  PerColumn(Vec<(String, T)>),
}

impl<T> Statistic<T> {
  pub fn shape(&self) -> Shape {
    match self {
      Statistic::Scalar(_) => Shape::Series,
      Statistic::PerColumn(_) => Shape::Table,
    }
  }

  pub fn scalar(self) -> Result<T> {
    match self {
      Statistic::Scalar(v) => Ok(v),
      Statistic::PerColumn(cols) => Err(RiskKitError::shape(
        "statistic (requested scalar from table result)",
        1,
        cols.len(),
      )),
    }
  }

  pub fn per_column(self) -> Result<Vec<(String, T)>> {
    match self {
      Statistic::PerColumn(cols) => Ok(cols),
      Statistic::Scalar(_) => Err(RiskKitError::shape(
        "statistic (requested columns from series result)",
        2,
        1,
      )),
    }
  }

  /// Value for a named column of a table statistic.
  pub fn get(&self, column: &str) -> Option<&T> {
    match self {
      Statistic::Scalar(_) => None,
      Statistic::PerColumn(cols) => cols.iter().find(|(c, _)| c == column).map(|(_, v)| v),
    }
  }
}
