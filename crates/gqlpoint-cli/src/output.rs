//! Output formatting and writing utilities
//!
//! Loaded documents are printed as SDL for people, or as structured
//! reports in JSON and YAML for tools.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use gqlpoint_core::{merge_typedefs, DocumentFile, Kind};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting serializable values per output format
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // human output of arbitrary data falls back to pretty JSON
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

/// Structured view of one loaded source
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceReport {
    pub file_path: String,
    pub kinds: Vec<Kind>,
    pub names: Vec<String>,
    pub sdl: String,
}

impl From<&DocumentFile> for SourceReport {
    fn from(file: &DocumentFile) -> Self {
        Self {
            file_path: file.file_path.clone(),
            kinds: file.content.kinds().collect(),
            names: file
                .content
                .defined_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            sdl: file.content.to_sdl(),
        }
    }
}

/// Every source merged into one document
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MergedReport {
    pub sources: Vec<String>,
    pub definitions: usize,
    pub sdl: String,
}

impl MergedReport {
    pub fn new(files: &[DocumentFile]) -> Self {
        let merged = merge_typedefs(files);
        Self {
            sources: files.iter().map(|f| f.file_path.clone()).collect(),
            definitions: merged.len(),
            sdl: merged.to_sdl(),
        }
    }
}

/// Output writer that handles different output formats and colors.
///
/// Results go to `writer`; status messages go to `messages` so that piped
/// SDL stays clean.
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
    messages: Box<dyn Write>,
}

impl OutputWriter {
    /// Results on stdout, messages on stderr
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writers(
            format,
            use_color,
            quiet,
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    /// Create an output writer with custom writers
    pub fn with_writers(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
        messages: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
            messages,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    fn message(&mut self, content: &str) -> Result<()> {
        writeln!(self.messages, "{}", content)?;
        self.messages.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet {
            return Ok(());
        }
        if self.use_color {
            self.message(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.message(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.use_color {
            self.message(&message.green().to_string())
        } else {
            self.message(message)
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Yaml {
            // serde_yaml already ends with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write loaded documents, either per source or merged
    pub fn documents(&mut self, files: &[DocumentFile], merge: bool) -> Result<()> {
        if self.format != OutputFormat::Human {
            return if merge {
                self.data(&MergedReport::new(files))
            } else {
                let reports: Vec<SourceReport> = files.iter().map(SourceReport::from).collect();
                self.data(&reports)
            };
        }

        if merge {
            return self.sdl(&merge_typedefs(files).to_sdl());
        }

        for (index, file) in files.iter().enumerate() {
            if index > 0 {
                self.writeln("")?;
            }
            let header = format!("# {}", file.file_path);
            if self.use_color {
                self.writeln(&header.dimmed().to_string())?;
            } else {
                self.writeln(&header)?;
            }
            self.sdl(&file.content.to_sdl())?;
        }
        Ok(())
    }

    fn sdl(&mut self, sdl: &str) -> Result<()> {
        if sdl.ends_with('\n') {
            self.write(sdl)
        } else {
            self.writeln(sdl)
        }
    }

    /// Write the list of definition kinds with their filter group
    pub fn kinds(&mut self) -> Result<()> {
        #[derive(Serialize)]
        struct KindEntry {
            kind: Kind,
            executable: bool,
        }

        if self.format != OutputFormat::Human {
            let entries: Vec<KindEntry> = Kind::all()
                .map(|kind| KindEntry {
                    kind,
                    executable: kind.is_executable(),
                })
                .collect();
            return self.data(&entries);
        }

        for kind in Kind::all() {
            let group = if kind.is_executable() { "document" } else { "schema" };
            if self.use_color {
                self.writeln(&format!("{:<32} {}", kind.as_str().bold(), group.dimmed()))?;
            } else {
                self.writeln(&format!("{:<32} {}", kind.as_str(), group))?;
            }
        }
        Ok(())
    }
}
