//! ACH file writer
//!
//! Renders a [`File`] as 94-character lines in NACHA order and pads the
//! output with lines of nines up to a whole number of 10-line blocks.

use crate::core::File;
use crate::io::fields::BLOCKING_FACTOR;
use crate::records::file_control::filler_line;
use crate::types::AchError;
use std::io::Write;

/// Options controlling how a file is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Terminator after every line, `"\n"` by default
    pub line_ending: String,
    /// Write without validating first; used to produce non-compliant test
    /// files on purpose
    pub bypass_validation: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            line_ending: "\n".to_string(),
            bypass_validation: false,
        }
    }
}

impl WriterOptions {
    /// Options writing `\r\n` line endings
    pub fn crlf() -> Self {
        WriterOptions {
            line_ending: "\r\n".to_string(),
            ..Self::default()
        }
    }
}

/// Writer of ACH files to any byte sink
#[derive(Debug)]
pub struct Writer<W> {
    output: W,
    options: WriterOptions,
}

impl<W: Write> Writer<W> {
    pub fn new(output: W) -> Self {
        Self::with_options(output, WriterOptions::default())
    }

    pub fn with_options(output: W, options: WriterOptions) -> Self {
        Writer { output, options }
    }

    /// Validate (unless bypassed) and write `file`, block padding included
    pub fn write(&mut self, file: &File) -> Result<(), AchError> {
        if !self.options.bypass_validation {
            file.validate()?;
        }
        let mut lines = file.lines();
        let padding = (BLOCKING_FACTOR - lines.len() % BLOCKING_FACTOR) % BLOCKING_FACTOR;
        lines.extend(std::iter::repeat_with(filler_line).take(padding));

        for line in &lines {
            self.output.write_all(line.as_bytes())?;
            self.output.write_all(self.options.line_ending.as_bytes())?;
        }
        self.output.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

/// Render `file` into memory
pub fn to_bytes(file: &File, options: &WriterOptions) -> Result<Vec<u8>, AchError> {
    let mut writer = Writer::with_options(Vec::new(), options.clone());
    writer.write(file)?;
    Ok(writer.into_inner())
}
