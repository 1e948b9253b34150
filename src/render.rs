use std::{
    fmt,
    io::{self, Write},
};

use serde::Deserialize;

use crate::domain::{ResolveError, ResolvedRow};

/// The delimiter placed between the fields of a table row.
///
/// Field values are not escaped, so a value containing the delimiter makes the
/// line ambiguous to split. Use [`Format::Json`] where that matters.
pub const DELIMITER: &str = " | ";

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One delimited line per row.
    #[default]
    Table,
    /// One JSON object per row.
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
        })
    }
}

/// Formats a row as a single delimited line, without a line terminator.
#[must_use]
pub fn table_line(row: &ResolvedRow<'_>) -> String {
    row.fields().join(DELIMITER)
}

/// Errors that can occur while writing resolved rows.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A row failed to resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The output could not be written.
    #[error("failed to write output")]
    Io(#[from] io::Error),
}

/// Writes resolved rows to an output, one line per row, in the order given.
#[derive(Debug)]
pub struct RowWriter<W: Write> {
    out: W,
    format: Format,
    rows: usize,
}

impl<W: Write> RowWriter<W> {
    /// Creates a writer producing the given format.
    pub const fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            rows: 0,
        }
    }

    /// Writes a single row.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_row(&mut self, row: &ResolvedRow<'_>) -> io::Result<()> {
        match self.format {
            Format::Table => writeln!(self.out, "{}", table_line(row))?,
            Format::Json => {
                serde_json::to_writer(&mut self.out, row)?;
                writeln!(self.out)?;
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Writes every row until the first resolution failure.
    ///
    /// Rows written before a failure are flushed before the failure is
    /// returned. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error, or an error if the output cannot
    /// be written.
    pub fn write_all<'a, I>(&mut self, rows: I) -> Result<usize, RenderError>
    where
        I: IntoIterator<Item = Result<ResolvedRow<'a>, ResolveError>>,
    {
        for row in rows {
            match row {
                Ok(row) => self.write_row(&row)?,
                Err(error) => {
                    self.out.flush()?;
                    return Err(error.into());
                }
            }
        }
        self.out.flush()?;
        Ok(self.rows)
    }

    /// The number of rows written so far.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the underlying output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be flushed.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
