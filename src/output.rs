//! Structured output of command results on stdout.

use std::io::{self, Write};

use azrm_azure::commands::Outcome;
use serde::{Deserialize, Serialize};

#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub trait OutputWriter {
    fn write_object<T: Serialize>(&mut self, value: &T) -> Result<(), OutputError>;

    /// With `enumerate`, every item is written as its own document;
    /// otherwise the whole sequence is written as one array.
    fn write_sequence<T: Serialize>(&mut self, items: &[T], enumerate: bool)
        -> Result<(), OutputError>;
}

/// Writes JSON (pretty) or YAML documents to any `Write` sink.
pub struct FormatWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> FormatWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn document<T: Serialize + ?Sized>(&mut self, value: &T, separated: bool) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, value)?;
                writeln!(self.out)?;
            }
            OutputFormat::Yaml => {
                if separated {
                    writeln!(self.out, "---")?;
                }
                self.out.write_all(serde_yaml::to_string(value)?.as_bytes())?;
            }
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for FormatWriter<W> {
    fn write_object<T: Serialize>(&mut self, value: &T) -> Result<(), OutputError> {
        self.document(value, false)?;
        self.out.flush()?;
        Ok(())
    }

    fn write_sequence<T: Serialize>(
        &mut self,
        items: &[T],
        enumerate: bool,
    ) -> Result<(), OutputError> {
        if enumerate {
            for item in items {
                self.document(item, true)?;
            }
        } else {
            self.document(items, false)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Write a read command's result: a single value as one object, a sequence
/// element by element unless `enumerate` is off.
pub fn emit<T: Serialize, O: OutputWriter>(
    out: &mut O,
    outcome: Outcome<T>,
    enumerate: bool,
) -> Result<(), OutputError> {
    match outcome {
        Outcome::One(item) => out.write_object(&item),
        Outcome::Many(items) => out.write_sequence(&items, enumerate),
    }
}
