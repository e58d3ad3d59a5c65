//! Dataset introspection for SAS, Stata and SPSS files
//!
//! Reading the binary formats is delegated to `polars-readstat-rs`. Any
//! failure to read a file (unknown extension, corrupt header, unsupported
//! variant) degrades to "unavailable" and never aborts a run.

use crate::error::Result;
use crate::hash::{self, HashAlgorithm, HashValue};
use anyhow::Context;
use polars_readstat_rs::{readstat_metadata_json, ReadStatFormat};
use serde::Deserialize;
use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};

/// Statistical file formats ddlog can introspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Sas,
    Stata,
    Spss,
}

impl FormatKind {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "sas7bdat" => Some(Self::Sas),
            "dta" => Some(Self::Stata),
            "sav" | "zsav" => Some(Self::Spss),
            _ => None,
        }
    }

    fn readstat_format(&self) -> ReadStatFormat {
        match self {
            Self::Sas => ReadStatFormat::Sas,
            Self::Stata => ReadStatFormat::Stata,
            Self::Spss => ReadStatFormat::Spss,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sas => write!(f, "SAS (sas7bdat)"),
            Self::Stata => write!(f, "Stata (dta)"),
            Self::Spss => write!(f, "SPSS (sav)"),
        }
    }
}

/// Header text and varlist extracted from a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    pub kind: FormatKind,
    pub header: String,
    /// Variable names in file order
    pub variables: Vec<String>,
}

/// Read the header and varlist of a dataset.
///
/// Returns `None` when the file is not a recognised format or cannot be
/// read as one; callers treat that as "no comparison possible".
///
/// A reader panic on a malformed file is caught and also yields `None`, but
/// the process panic hook still runs first, so the standard panic message
/// appears on stderr ahead of the "Varlist unavailable" warning.
pub fn read_variables(path: &Path) -> Option<FormatInfo> {
    let kind = match FormatKind::from_path(path) {
        Some(kind) => kind,
        None => {
            log::debug!("No varlist reader for {}", path.display());
            return None;
        }
    };

    match load_format_info(path, kind) {
        Ok(info) => {
            log::debug!(
                "Read {} variables from {} file {}",
                info.variables.len(),
                kind,
                path.display()
            );
            Some(info)
        }
        Err(e) => {
            log::warn!("Varlist unavailable for {}: {:#}", path.display(), e);
            None
        }
    }
}

fn load_format_info(path: &Path, kind: FormatKind) -> anyhow::Result<FormatInfo> {
    let format = kind.readstat_format();
    let json = std::panic::catch_unwind(|| readstat_metadata_json(path, Some(format)))
        .map_err(|_| anyhow::anyhow!("reader panicked"))
        .and_then(|r| r.map_err(anyhow::Error::msg))
        .with_context(|| format!("reading {} metadata", kind))?;

    let (summary, variables) = match kind {
        FormatKind::Sas => {
            let meta: SasMetadata =
                serde_json::from_str(&json).context("decoding SAS metadata")?;
            meta.into_parts()
        }
        FormatKind::Stata => {
            let meta: StataMetadata =
                serde_json::from_str(&json).context("decoding Stata metadata")?;
            meta.into_parts()
        }
        FormatKind::Spss => {
            let meta: SpssMetadata =
                serde_json::from_str(&json).context("decoding SPSS metadata")?;
            meta.into_parts()
        }
    };

    let header = render_header(kind, &summary, &variables);
    let variables = variables.into_iter().map(|v| v.name).collect();

    Ok(FormatInfo {
        kind,
        header,
        variables,
    })
}

/// One row of the "Contents of dataset" table
#[derive(Debug, Clone, Default)]
struct VariableRow {
    name: String,
    var_type: String,
    format: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct SasMetadata {
    #[serde(default)]
    table_name: Option<String>,
    #[serde(default)]
    row_count: Option<u64>,
    #[serde(default)]
    file_type: Option<String>,
    #[serde(default)]
    sas_release: Option<String>,
    #[serde(default)]
    sas_server_type: Option<String>,
    #[serde(default)]
    os_name: Option<String>,
    #[serde(default)]
    creator_proc: Option<String>,
    #[serde(default)]
    file_encoding: Option<String>,
    #[serde(default)]
    compression: Option<String>,
    columns: Vec<SasColumn>,
}

#[derive(Debug, Deserialize)]
struct SasColumn {
    name: String,
    #[serde(rename = "type", default)]
    col_type: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

impl SasMetadata {
    fn into_parts(self) -> (Vec<(&'static str, String)>, Vec<VariableRow>) {
        let mut summary = Vec::new();
        push_field(&mut summary, "Table", self.table_name);
        push_field(&mut summary, "Rows", self.row_count.map(|n| n.to_string()));
        push_field(&mut summary, "File type", self.file_type);
        push_field(&mut summary, "SAS release", self.sas_release);
        push_field(&mut summary, "Server type", self.sas_server_type);
        push_field(&mut summary, "OS", self.os_name);
        push_field(&mut summary, "Creator proc", self.creator_proc);
        push_field(&mut summary, "Encoding", self.file_encoding);
        push_field(&mut summary, "Compression", self.compression);

        let rows = self
            .columns
            .into_iter()
            .map(|c| VariableRow {
                name: c.name,
                var_type: c.col_type.unwrap_or_default(),
                format: c.format.unwrap_or_default(),
                label: c.label.unwrap_or_default(),
            })
            .collect();
        (summary, rows)
    }
}

#[derive(Debug, Deserialize)]
struct StataMetadata {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    row_count: Option<u64>,
    #[serde(default)]
    data_label: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
    variables: Vec<StataVariable>,
}

#[derive(Debug, Deserialize)]
struct StataVariable {
    name: String,
    #[serde(rename = "type", default)]
    var_type: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

impl StataMetadata {
    fn into_parts(self) -> (Vec<(&'static str, String)>, Vec<VariableRow>) {
        let mut summary = Vec::new();
        push_field(&mut summary, "Rows", self.row_count.map(|n| n.to_string()));
        push_field(&mut summary, "Release", self.version.map(|v| v.to_string()));
        push_field(&mut summary, "Data label", self.data_label);
        push_field(&mut summary, "Timestamp", self.timestamp);
        push_field(&mut summary, "Encoding", self.encoding);

        let rows = self
            .variables
            .into_iter()
            .map(|v| VariableRow {
                name: v.name,
                var_type: v.var_type.unwrap_or_default(),
                format: v.format.unwrap_or_default(),
                label: v.label.unwrap_or_default(),
            })
            .collect();
        (summary, rows)
    }
}

#[derive(Debug, Deserialize)]
struct SpssMetadata {
    #[serde(default)]
    file_label: Option<String>,
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    row_count: Option<u64>,
    #[serde(default)]
    compression: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
    variables: Vec<SpssVariable>,
}

#[derive(Debug, Deserialize)]
struct SpssVariable {
    name: String,
    #[serde(rename = "type", default)]
    var_type: Option<String>,
    #[serde(default)]
    string_len: Option<u64>,
    #[serde(default)]
    label: Option<String>,
}

impl SpssMetadata {
    fn into_parts(self) -> (Vec<(&'static str, String)>, Vec<VariableRow>) {
        let mut summary = Vec::new();
        push_field(&mut summary, "File label", self.file_label);
        push_field(&mut summary, "Rows", self.row_count.map(|n| n.to_string()));
        push_field(&mut summary, "Version", self.version.map(|v| v.to_string()));
        push_field(&mut summary, "Compression", self.compression);
        push_field(&mut summary, "Encoding", self.encoding);

        let rows = self
            .variables
            .into_iter()
            .map(|v| VariableRow {
                name: v.name,
                var_type: v.var_type.unwrap_or_default(),
                format: match v.string_len {
                    Some(len) if len > 0 => format!("A{}", len),
                    _ => String::new(),
                },
                label: v.label.unwrap_or_default(),
            })
            .collect();
        (summary, rows)
    }
}

fn push_field(summary: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        summary.push((name, value.trim().to_string()));
    }
}

/// Render metadata as plain text: a key/value block followed by a
/// fixed-width table of variables in file order
fn render_header(kind: FormatKind, summary: &[(&str, String)], rows: &[VariableRow]) -> String {
    let mut fields: Vec<(&str, String)> = vec![("Format", kind.to_string())];
    fields.extend(summary.iter().map(|(k, v)| (*k, v.clone())));
    fields.push(("Variables", rows.len().to_string()));

    let key_width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in &fields {
        out.push_str(&format!("{:<width$}  {}\n", format!("{}:", key), value, width = key_width + 1));
    }

    out.push_str("\nContents of dataset\n\n");

    let numbers: Vec<String> = (1..=rows.len()).map(|i| i.to_string()).collect();
    let table: Vec<[&str; 5]> = rows
        .iter()
        .zip(&numbers)
        .map(|(r, n)| {
            [
                n.as_str(),
                r.name.as_str(),
                r.var_type.as_str(),
                r.format.as_str(),
                r.label.as_str(),
            ]
        })
        .collect();
    let titles = ["#", "Name", "Type", "Format", "Label"];

    let mut widths = titles.map(str::len);
    for row in &table {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str; 5]| {
        let mut line = format!("{:>width$}", cells[0], width = widths[0]);
        for (cell, width) in cells.iter().zip(widths).skip(1) {
            line.push_str("  ");
            line.push_str(&format!("{:<width$}", cell, width = width));
        }
        line.trim_end().to_string()
    };

    out.push_str(&format_line(&titles));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &table {
        out.push_str(&format_line(row));
        out.push('\n');
    }

    out.trim_end().to_string()
}

/// A file referenced by a log entry: the processed file or the raw file.
///
/// The digest and the format information are computed on first use and
/// cached for the rest of the run.
#[derive(Debug)]
pub struct FileDescriptor {
    path: PathBuf,
    algorithm: HashAlgorithm,
    digest: OnceCell<HashValue>,
    format: OnceCell<Option<FormatInfo>>,
}

impl FileDescriptor {
    pub fn new(path: impl Into<PathBuf>, algorithm: HashAlgorithm) -> Self {
        Self {
            path: path.into(),
            algorithm,
            digest: OnceCell::new(),
            format: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Digest of the file contents
    pub fn digest(&self) -> Result<&str> {
        self.digest_with_progress(|_| {})
    }

    /// Digest of the file contents, reporting bytes hashed on first computation
    pub fn digest_with_progress<F: FnMut(u64)>(&self, on_progress: F) -> Result<&str> {
        if let Some(value) = self.digest.get() {
            return Ok(value.as_str());
        }
        let value = hash::digest_with_progress(
            &self.path,
            self.algorithm,
            hash::DEFAULT_CHUNK_SIZE,
            on_progress,
        )?;
        Ok(self.digest.get_or_init(|| value).as_str())
    }

    /// Header and varlist, if the file is a readable dataset
    pub fn format_info(&self) -> Option<&FormatInfo> {
        self.format.get_or_init(|| read_variables(&self.path)).as_ref()
    }

    pub fn header(&self) -> Option<&str> {
        self.format_info().map(|info| info.header.as_str())
    }

    pub fn variables(&self) -> Option<&[String]> {
        self.format_info().map(|info| info.variables.as_slice())
    }

    /// Size of the file on disk in bytes
    pub fn size(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}
