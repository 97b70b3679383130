//! CSV form of an indicator table.
//!
//! Columns: `timestamp,open,high,low,close,sma_fast,sma_slow,rsi,macd,macd_signal`.
//! Timestamps are RFC 3339, undefined indicator values are empty cells.

use std::io;

use tracing::debug;

use crate::{Error, IndicatorRow, Result};

/// Writes `rows` as CSV with a header line.
///
/// # Errors
///
/// [`Error::Csv`](crate::Error::Csv) when serialization or the underlying
/// writer fails.
pub fn write_csv<'a, W, I>(rows: I, writer: W) -> Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = &'a IndicatorRow>,
{
    let mut csv = csv::Writer::from_writer(writer);
    let mut written = 0_usize;
    for row in rows {
        csv.serialize(row)?;
        written += 1;
    }
    csv.flush()?;

    debug!(rows = written, "exported indicator table");
    Ok(())
}

/// Renders `rows` into an in-memory CSV string.
///
/// # Errors
///
/// See [`write_csv`].
///
/// # Example
///
/// ```
/// use ta_verdict::{IndicatorEngine, PriceBar, export};
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let bars = [PriceBar::new(at, 10.0, 10.5, 9.5, 10.25)];
/// let rows = IndicatorEngine::default().compute(&bars).unwrap();
///
/// let csv = export::to_csv_string(&rows).unwrap();
/// let mut lines = csv.lines();
/// assert_eq!(
///     lines.next(),
///     Some("timestamp,open,high,low,close,sma_fast,sma_slow,rsi,macd,macd_signal")
/// );
/// assert_eq!(lines.next(), Some("2024-03-01T00:00:00Z,10.0,10.5,9.5,10.25,,,,0.0,0.0"));
/// ```
pub fn to_csv_string<'a, I>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = &'a IndicatorRow>,
{
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}

/// Reads a table previously produced by [`write_csv`].
///
/// # Errors
///
/// [`Error::Csv`] on malformed input, missing columns or unparsable values.
/// [`Error::NonFiniteValue`] when a price or indicator cell holds NaN or
/// infinity.
pub fn read_csv(reader: impl io::Read) -> Result<Vec<IndicatorRow>> {
    let rows = csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<IndicatorRow>, csv::Error>>()?;

    for (index, row) in rows.iter().enumerate() {
        check_finite(index, row)?;
    }

    debug!(rows = rows.len(), "imported indicator table");
    Ok(rows)
}

fn check_finite(index: usize, row: &IndicatorRow) -> Result<()> {
    let cells = [
        ("open", Some(row.open)),
        ("high", Some(row.high)),
        ("low", Some(row.low)),
        ("close", Some(row.close)),
        ("sma_fast", row.sma_fast),
        ("sma_slow", row.sma_slow),
        ("rsi", row.rsi),
        ("macd", row.macd),
        ("macd_signal", row.macd_signal),
    ];

    match cells
        .into_iter()
        .find_map(|(column, value)| value.filter(|v| !v.is_finite()).map(|v| (column, v)))
    {
        None => Ok(()),
        Some((column, value)) => Err(Error::NonFiniteValue {
            row: index,
            column,
            value,
        }),
    }
}
