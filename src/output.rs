//! Log entry formatting
//!
//! An entry is Markdown: a top-level heading, a bullet list describing the
//! files, then optional sections for varlists, dataset headers and the
//! processing log, each embedded in a fenced code block.

use crate::change_detection::VariableListComparison;
use crate::hash::HashAlgorithm;
use chrono::{DateTime, Local};
use std::path::Path;

/// Sortable local timestamp format used in entries
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a timestamp the way entries record it
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time as an entry timestamp
pub fn timestamp_now() -> String {
    format_timestamp(&Local::now())
}

/// What a file contributes to an entry
#[derive(Debug, Clone, Copy)]
pub struct FileSummary<'a> {
    pub path: &'a Path,
    pub digest: &'a str,
    pub variables: Option<&'a [String]>,
    pub header: Option<&'a str>,
}

/// Everything an entry is built from
#[derive(Debug, Clone)]
pub struct EntryContent<'a> {
    pub timestamp: String,
    pub algorithm: HashAlgorithm,
    pub processed: FileSummary<'a>,
    pub raw: Option<FileSummary<'a>>,
    pub note: Option<&'a str>,
    pub script: Option<&'a str>,
    pub comparison: Option<&'a VariableListComparison>,
    pub proclog: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Timestamp,
    ProcessedFile,
    RawFile,
    Note,
    Script,
    Varlists,
    ProcessedHeader,
    RawHeader,
    ProcessingLog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
}

/// A formatted log entry, kept as its ordered sections until rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
    sections: Vec<Section>,
}

impl LogEntry {
    /// Build an entry; sections whose input is absent are left out
    pub fn from_content(content: &EntryContent<'_>) -> Self {
        let mut entry = Self::default();
        let label = content.algorithm.label();

        entry.push(
            SectionKind::Timestamp,
            format!("\n# Log update\n\n  - Date log updated: {}\n", content.timestamp),
        );
        entry.push(
            SectionKind::ProcessedFile,
            file_bullet("Processed file", &content.processed, label),
        );
        if let Some(raw) = &content.raw {
            entry.push(SectionKind::RawFile, file_bullet("Raw file", raw, label));
        }
        if let Some(note) = content.note {
            entry.push(SectionKind::Note, format!("  - Note: {}\n", note));
        }
        if let Some(script) = content.script {
            entry.push(SectionKind::Script, format!("  - Processing script: {}\n", script));
        }

        let processed_vars = content.processed.variables;
        let raw_vars = content.raw.as_ref().and_then(|r| r.variables);
        if processed_vars.is_some() || raw_vars.is_some() {
            entry.push(
                SectionKind::Varlists,
                varlist_section(processed_vars, raw_vars, content.comparison),
            );
        }

        if let Some(header) = content.processed.header {
            entry.push(
                SectionKind::ProcessedHeader,
                fenced_section("Header of processed file", header),
            );
        }
        if let Some(header) = content.raw.as_ref().and_then(|r| r.header) {
            entry.push(SectionKind::RawHeader, fenced_section("Header of raw file", header));
        }
        if let Some(proclog) = content.proclog {
            entry.push(
                SectionKind::ProcessingLog,
                fenced_section("Log file from processing script", proclog.trim_end()),
            );
        }

        entry
    }

    fn push(&mut self, kind: SectionKind, text: String) {
        self.sections.push(Section { kind, text });
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Serialize the entry to the text written into the log file
    pub fn render(&self) -> String {
        self.sections.iter().map(|s| s.text.as_str()).collect()
    }
}

fn file_bullet(title: &str, file: &FileSummary<'_>, label: &str) -> String {
    format!(
        "  - {}\n    * Path: {}\n    * {} hash: {}\n",
        title,
        file.path.display(),
        label,
        file.digest
    )
}

fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

fn varlist_item(out: &mut String, title: &str, names: &[String]) {
    out.push_str(&format!(
        "  - {} ({})\n    * {}\n",
        title,
        names.len(),
        name_list(names)
    ));
}

fn varlist_section(
    processed: Option<&[String]>,
    raw: Option<&[String]>,
    comparison: Option<&VariableListComparison>,
) -> String {
    let mut out = String::from("\n## Varlists\n\n");
    if let Some(names) = processed {
        varlist_item(&mut out, "Variables in processed file", names);
    }
    if let Some(names) = raw {
        varlist_item(&mut out, "Variables in raw file", names);
    }
    if let Some(cmp) = comparison {
        varlist_item(&mut out, "Variables in both files", &cmp.common);
        varlist_item(&mut out, "Variables only in processed file", &cmp.left_only);
        varlist_item(&mut out, "Variables only in raw file", &cmp.right_only);
    }
    out
}

/// A fence of backticks longer than any run inside `body`
fn fence_for(body: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in body.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat(longest.max(2) + 1)
}

fn fenced_section(title: &str, body: &str) -> String {
    let fence = fence_for(body);
    format!("\n## {}\n\n{}\n{}\n{}\n", title, fence, body, fence)
}
