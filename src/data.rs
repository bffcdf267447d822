//! # Data
//!
//! $$
//! r_{t,j} = \frac{x_{t,j}}{100}
//! $$
//!
//! Readers for the flat-file return tables: a period column followed by
//! numeric columns, usually quoted in percent.

use std::path::Path;
use std::path::PathBuf;

use ndarray::Array1;
use ndarray::Array2;
use tracing::debug;

use crate::error::Result;
use crate::error::RiskKitError;
use crate::series::Period;
use crate::series::PeriodIndex;
use crate::series::Series;
use crate::series::Table;

/// How the first column encodes the period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexFormat {
  /// `192607`
  YearMonth,
  /// `1997-01-31` or `31/01/1997`
  Date,
}

#[derive(Clone, Debug)]
pub struct CsvFormat {
  pub index: IndexFormat,
  /// Every value is divided by this (100 for percentages).
  pub divisor: f64,
  /// Sentinel read as missing.
  pub na_value: Option<f64>,
  /// Trim and lowercase the column names.
  pub normalize_columns: bool,
  /// Keep only these `(source, renamed)` columns, in this order. Source names
  /// are matched after normalisation.
  pub columns: Option<Vec<(String, String)>>,
}

impl Default for CsvFormat {
  fn default() -> Self {
    Self {
      index: IndexFormat::YearMonth,
      divisor: 1.0,
      na_value: None,
      normalize_columns: true,
      columns: None,
    }
  }
}

impl CsvFormat {
  pub fn percent() -> Self {
    Self {
      divisor: 100.0,
      ..Self::default()
    }
  }

  fn parse_period(&self, s: &str) -> Result<Period> {
    match self.index {
      IndexFormat::YearMonth => Period::parse_yyyymm(s),
      IndexFormat::Date => Period::parse_date(s),
    }
  }

  fn parse_value(&self, s: &str, row: usize, col: &str) -> Result<f64> {
    if s.is_empty() {
      return Ok(f64::NAN);
    }
    let x = s.parse::<f64>().map_err(|e| {
      RiskKitError::invalid(format!("row {row}, column '{col}': '{s}' is not a number ({e})"))
    })?;
    if self.na_value.is_some_and(|na| (x - na).abs() < 1e-9) {
      return Ok(f64::NAN);
    }
    Ok(x / self.divisor)
  }
}

/// Read a period-indexed table of numbers.
pub fn read_returns_csv(path: impl AsRef<Path>, format: &CsvFormat) -> Result<Table> {
  let path = path.as_ref();
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .trim(csv::Trim::All)
    .from_path(path)?;

  let headers = reader.headers()?.clone();
  let columns = headers
    .iter()
    .skip(1)
    .map(|h| {
      if format.normalize_columns {
        h.trim().to_lowercase()
      } else {
        h.to_string()
      }
    })
    .collect::<Vec<_>>();
  if columns.is_empty() {
    return Err(RiskKitError::invalid(format!(
      "{} has no value columns",
      path.display()
    )));
  }

  let mut periods = Vec::new();
  let mut cells = Vec::new();
  for (row, record) in reader.records().enumerate() {
    let record = record?;
    let label = record.get(0).unwrap_or_default();
    periods.push(format.parse_period(label)?);
    for (field, col) in record.iter().skip(1).zip(&columns) {
      cells.push(format.parse_value(field, row, col)?);
    }
  }

  let index = PeriodIndex::from_periods(&periods)?;
  let ncols = columns.len();
  let values = Array2::from_shape_vec((index.len, ncols), cells)
    .map_err(|e| RiskKitError::invalid(format!("{}: {e}", path.display())))?;
  let table = Table::new(columns, index.start, values)?;

  debug!(
    path = %path.display(),
    rows = table.nrows(),
    cols = table.ncols(),
    start = %index.start,
    "loaded return table"
  );

  match &format.columns {
    Some(pairs) => {
      let sources = pairs.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>();
      let renamed = pairs.iter().map(|(_, r)| r.clone()).collect();
      table.select(&sources)?.with_columns(renamed)
    }
    None => Ok(table),
  }
}

/// Where the flat files live.
#[derive(Clone, Debug)]
pub struct DataConfig {
  pub data_dir: PathBuf,
}

impl Default for DataConfig {
  fn default() -> Self {
    Self {
      data_dir: PathBuf::from("data"),
    }
  }
}

impl DataConfig {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self {
      data_dir: data_dir.into(),
    }
  }

  fn path(&self, file: &str) -> PathBuf {
    self.data_dir.join(file)
  }
}

pub const FFME_FILE: &str = "Portfolios_Formed_on_ME_monthly_EW.csv";
pub const HFI_FILE: &str = "edhec-hedgefundindices.csv";
pub const IND_RETURNS_FILE: &str = "ind30_m_vw_rets.csv";
pub const IND_SIZE_FILE: &str = "ind30_m_size.csv";
pub const IND_NFIRMS_FILE: &str = "ind30_m_nfirms.csv";

/// Fama-French bottom and top market-cap deciles as `small_cap` / `large_cap`.
pub fn ffme_returns(config: &DataConfig) -> Result<Table> {
  let format = CsvFormat {
    na_value: Some(-99.99),
    columns: Some(vec![
      ("lo 10".to_string(), "small_cap".to_string()),
      ("hi 10".to_string(), "large_cap".to_string()),
    ]),
    ..CsvFormat::percent()
  };
  read_returns_csv(config.path(FFME_FILE), &format)
}

/// EDHEC hedge fund index returns.
pub fn hfi_returns(config: &DataConfig) -> Result<Table> {
  let format = CsvFormat {
    index: IndexFormat::Date,
    ..CsvFormat::percent()
  };
  read_returns_csv(config.path(HFI_FILE), &format)
}

/// Value-weighted monthly returns of the 30 Ken French industry portfolios.
pub fn ind_returns(config: &DataConfig) -> Result<Table> {
  read_returns_csv(config.path(IND_RETURNS_FILE), &CsvFormat::percent())
}

/// Average firm size of each industry portfolio.
pub fn ind_size(config: &DataConfig) -> Result<Table> {
  read_returns_csv(config.path(IND_SIZE_FILE), &CsvFormat::default())
}

/// Number of firms in each industry portfolio.
pub fn ind_nfirms(config: &DataConfig) -> Result<Table> {
  read_returns_csv(config.path(IND_NFIRMS_FILE), &CsvFormat::default())
}

/// Returns of the cap-weighted total market built from the industry tables.
pub fn total_market_index_returns(config: &DataConfig) -> Result<Series> {
  cap_weighted_returns(&ind_returns(config)?, &ind_nfirms(config)?, &ind_size(config)?)
}

/// $\sum_j w_{t,j} r_{t,j}$ with $w_{t,j} \propto n_{t,j} s_{t,j}$.
pub fn cap_weighted_returns(returns: &Table, nfirms: &Table, size: &Table) -> Result<Series> {
  for (what, other) in [("firm counts", nfirms), ("firm sizes", size)] {
    if other.values().dim() != returns.values().dim() {
      return Err(RiskKitError::shape(what, returns.values().len(), other.values().len()));
    }
    if other.index() != returns.index() || other.columns() != returns.columns() {
      return Err(RiskKitError::invalid(format!(
        "{what} are not aligned with the returns table"
      )));
    }
  }

  let mktcap = nfirms.values() * size.values();
  let total = mktcap
    .rows()
    .into_iter()
    .zip(returns.values().rows())
    .map(|(cap, r)| {
      let sum = cap.sum();
      cap.iter().zip(r.iter()).map(|(c, r)| c / sum * r).sum::<f64>()
    })
    .collect::<Array1<f64>>();

  Ok(Series::new("total_market", returns.index().start, total))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  fn write(dir: &Path, file: &str, body: &str) {
    fs::write(dir.join(file), body).unwrap();
  }

  #[test]
  fn ffme_selects_and_renames_deciles() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(
      dir.path(),
      FFME_FILE,
      ",Lo 30,Lo 10,Hi 10\n192607,1.0,-0.5,3.1\n192608,2.0,-99.99,1.5\n192609,0.1,2.25,-1.0\n",
    );
    let t = ffme_returns(&DataConfig::new(dir.path()))?;
    assert_eq!(t.columns(), &["small_cap".to_string(), "large_cap".to_string()]);
    assert_eq!(t.index().start, Period::new(1926, 7)?);
    assert_eq!(t.nrows(), 3);
    assert_abs_diff_eq!(t.values()[[0, 0]], -0.005, epsilon = 1e-15);
    assert!(t.values()[[1, 0]].is_nan());
    assert_abs_diff_eq!(t.values()[[2, 1]], -0.01, epsilon = 1e-15);
    Ok(())
  }

  #[test]
  fn hfi_reads_dates_and_normalizes_names() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(
      dir.path(),
      HFI_FILE,
      "date,Convertible Arbitrage, CTA Global \n31/01/1997,1.19,3.93\n28/02/1997,1.23,2.98\n",
    );
    let t = hfi_returns(&DataConfig::new(dir.path()))?;
    assert_eq!(t.columns(), &["convertible arbitrage".to_string(), "cta global".to_string()]);
    assert_eq!(t.index().get(1), Some(Period::new(1997, 2)?));
    assert_abs_diff_eq!(t.values()[[1, 1]], 0.0298, epsilon = 1e-15);
    Ok(())
  }

  #[test]
  fn gaps_in_the_index_are_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), IND_RETURNS_FILE, ",Food\n192607,1.0\n192609,2.0\n");
    let err = ind_returns(&DataConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, RiskKitError::InvalidInput(_)));
    Ok(())
  }

  #[test]
  fn missing_file_is_an_error() {
    let cfg = DataConfig::new("/definitely/not/here");
    assert!(ind_size(&cfg).is_err());
  }

  #[test]
  fn non_numeric_cell_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), IND_SIZE_FILE, ",Food\n192607,abc\n");
    assert!(matches!(
      ind_size(&DataConfig::new(dir.path())),
      Err(RiskKitError::InvalidInput(_))
    ));
    Ok(())
  }

  #[test]
  fn total_market_is_cap_weighted() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), IND_RETURNS_FILE, ",Food ,Beer\n192607,1.0,3.0\n192608,-2.0,2.0\n");
    write(dir.path(), IND_NFIRMS_FILE, ",Food ,Beer\n192607,10,30\n192608,10,10\n");
    write(dir.path(), IND_SIZE_FILE, ",Food ,Beer\n192607,1.0,1.0\n192608,3.0,1.0\n");
    let total = total_market_index_returns(&DataConfig::new(dir.path()))?;
    assert_eq!(total.len(), 2);
    // 25% / 75% then 75% / 25%
    assert_abs_diff_eq!(total.values[0], 0.25 * 0.01 + 0.75 * 0.03, epsilon = 1e-15);
    assert_abs_diff_eq!(total.values[1], 0.75 * -0.02 + 0.25 * 0.02, epsilon = 1e-15);
    Ok(())
  }

  #[test]
  fn misaligned_industry_tables_are_rejected() -> anyhow::Result<()> {
    let start = Period::new(2000, 1)?;
    let r = Table::new(vec!["a".into(), "b".into()], start, array![[0.1, 0.2]])?;
    let n = Table::new(vec!["a".into()], start, array![[1.0]])?;
    assert!(matches!(
      cap_weighted_returns(&r, &n, &r),
      Err(RiskKitError::ShapeMismatch { .. })
    ));
    let other = Table::new(vec!["b".into(), "a".into()], start, array![[1.0, 1.0]])?;
    assert!(cap_weighted_returns(&r, &other, &r).is_err());
    Ok(())
  }
}
