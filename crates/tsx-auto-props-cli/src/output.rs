//! Output formatting.

use crate::cli::OutputFormat;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use source_map::LineIndex;
use vue_tsx_auto_props::TransformError;

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Props metadata was injected.
    Rewritten,
    /// Nothing to inject.
    Unchanged,
    /// The file could not be read or parsed.
    Failed,
}

/// One injected component, as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentReport {
    /// The component's binding name.
    pub name: String,
    /// The injected property names.
    pub props: Vec<String>,
}

/// Per-file record.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// The file path.
    pub filename: Utf8PathBuf,
    /// The outcome.
    pub status: Status,
    /// Injected components, for rewritten files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentReport>,
    /// The failure, formatted as `path:line:col: message`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// A file with nothing to inject.
    pub fn unchanged(filename: Utf8PathBuf) -> Self {
        Self {
            filename,
            status: Status::Unchanged,
            components: Vec::new(),
            error: None,
        }
    }

    /// A file that could not be processed.
    pub fn failed(filename: Utf8PathBuf, error: String) -> Self {
        Self {
            filename,
            status: Status::Failed,
            components: Vec::new(),
            error: Some(error),
        }
    }
}

/// Formats a transform error as `path:line:col: message` (1-indexed).
pub fn format_transform_error(path: &Utf8Path, source: &str, error: &TransformError) -> String {
    let message = match error {
        TransformError::Syntax(syntax) => &syntax.message,
    };
    let pos = LineIndex::new(source).line_col(error.span().start);
    format!(
        "{}:{}:{}: syntax error: {}",
        path,
        pos.line + 1,
        pos.col + 1,
        message
    )
}

/// Summary of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Per-file records, in path order.
    pub files: Vec<FileReport>,
    /// Whether `--check` was given.
    pub check: bool,
}

impl RunSummary {
    /// Number of files with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    /// Returns whether the process should exit with an error.
    pub fn is_failure(&self) -> bool {
        self.count(Status::Failed) > 0 || (self.check && self.count(Status::Rewritten) > 0)
    }

    /// Formats the summary.
    pub fn format(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human()),
            OutputFormat::Json => serde_json::to_string_pretty(&self.files),
        }
    }

    fn format_human(&self) -> String {
        let mut output = String::new();
        let verb = if self.check { "would rewrite" } else { "rewrote" };

        for file in &self.files {
            match file.status {
                Status::Rewritten => {
                    let names: Vec<&str> = file.components.iter().map(|c| c.name.as_str()).collect();
                    output.push_str(&format!("{} {} ({})\n", verb, file.filename, names.join(", ")));
                }
                Status::Failed => {
                    if let Some(error) = &file.error {
                        output.push_str(error);
                        output.push('\n');
                    }
                }
                Status::Unchanged => {}
            }
        }

        let file_word = |n: usize| if n == 1 { "file" } else { "files" };
        let rewritten = self.count(Status::Rewritten);
        let unchanged = self.count(Status::Unchanged);
        let failed = self.count(Status::Failed);
        output.push_str(&format!(
            "{} {} {}, {} unchanged, {} failed",
            verb,
            rewritten,
            file_word(rewritten),
            unchanged,
            failed
        ));
        output
    }
}
