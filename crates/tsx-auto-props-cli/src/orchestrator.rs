//! Main orchestration logic.

use crate::cli::{Args, SourceMapMode};
use crate::output::{format_transform_error, ComponentReport, FileReport, RunSummary, Status};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use source_map::SourceMapV3;
use std::fs;
use std::io::{self, Read, Write};
use thiserror::Error;
use vue_tsx_auto_props::{transform_with_options, RewriteResult, TransformOptions, DEFAULT_FILENAME};
use walkdir::WalkDir;

/// Glob patterns that are always ignored.
const DEFAULT_IGNORES: [&str; 3] = ["**/node_modules/**", "**/dist/**", "**/.git/**"];

/// Errors that abort the whole run.
///
/// Per-file read and parse failures are reported in the summary instead.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum CliError {
    /// Argument combination clap cannot reject.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(#[from] globset::Error),

    /// A path given on the command line does not exist.
    #[error("no such file or directory: {0}")]
    MissingPath(Utf8PathBuf),

    /// Failed to read stdin.
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    /// Failed to write output.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The destination.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Failed to serialize a source map or summary.
    #[error("failed to serialize: {0}")]
    Json(#[from] serde_json::Error),
}

/// A file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as found on disk.
    pub path: Utf8PathBuf,
    /// Path relative to the argument it was found under; mirrored by `--out-dir`.
    pub relative: Utf8PathBuf,
}

/// The outcome of processing one file.
struct Processed {
    report: FileReport,
    rewrite: Option<RewriteResult>,
}

/// Runs the tool.
pub fn run(args: &Args) -> Result<RunSummary, CliError> {
    args.validate().map_err(CliError::InvalidArgs)?;

    if args.reads_stdin() {
        return run_stdin(args);
    }

    let files = discover(args)?;
    tracing::debug!(count = files.len(), "discovered files");

    let processed: Vec<Processed> = files.par_iter().map(process_file).collect();

    let mut summary = RunSummary {
        files: Vec::with_capacity(processed.len()),
        check: args.check,
    };
    for (file, result) in files.iter().zip(processed) {
        if let Some(rewrite) = &result.rewrite {
            emit(args, file, rewrite)?;
        }
        summary.files.push(result.report);
    }

    Ok(summary)
}

/// Builds the ignore set from user patterns plus [`DEFAULT_IGNORES`].
fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, CliError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    for pattern in DEFAULT_IGNORES {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

fn has_extension(path: &Utf8Path, extensions: &[&str]) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.iter().any(|wanted| *wanted == ext))
}

/// Finds the files to transform, sorted by path.
pub fn discover(args: &Args) -> Result<Vec<SourceFile>, CliError> {
    let ignore_set = build_ignore_set(&args.ignore)?;
    let extensions = args.normalized_extensions();
    let mut files = Vec::new();

    for root in &args.paths {
        if root.is_file() {
            if has_extension(root, &extensions) {
                let relative = Utf8PathBuf::from(root.file_name().unwrap_or(root.as_str()));
                files.push(SourceFile {
                    path: root.clone(),
                    relative,
                });
            } else {
                tracing::debug!(path = %root, "extension not selected, skipping");
            }
            continue;
        }
        if !root.exists() {
            return Err(CliError::MissingPath(root.clone()));
        }

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(%err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(path) = Utf8PathBuf::try_from(entry.into_path()) else {
                tracing::warn!("skipping non UTF-8 path");
                continue;
            };
            if !has_extension(&path, &extensions) {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path.as_path()).to_path_buf();
            if ignore_set.is_match(relative.as_str()) {
                tracing::trace!(path = %path, "ignored");
                continue;
            }
            files.push(SourceFile { path, relative });
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}

fn process_file(file: &SourceFile) -> Processed {
    let source = match fs::read_to_string(&file.path) {
        Ok(source) => source,
        Err(err) => {
            let message = format!("{}: failed to read: {}", file.path, err);
            return Processed {
                report: FileReport::failed(file.path.clone(), message),
                rewrite: None,
            };
        }
    };
    process_source(&file.path, &source)
}

fn process_source(path: &Utf8Path, source: &str) -> Processed {
    let options = TransformOptions {
        filename: Some(path.to_string()),
    };

    match transform_with_options(source, &options) {
        Ok(Some(rewrite)) => {
            tracing::debug!(path = %path, components = rewrite.components.len(), "rewritten");
            let components = rewrite
                .components
                .iter()
                .map(|injected| ComponentReport {
                    name: injected.component.to_string(),
                    props: injected.props.iter().map(str::to_string).collect(),
                })
                .collect();
            Processed {
                report: FileReport {
                    filename: path.to_path_buf(),
                    status: Status::Rewritten,
                    components,
                    error: None,
                },
                rewrite: Some(rewrite),
            }
        }
        Ok(None) => Processed {
            report: FileReport::unchanged(path.to_path_buf()),
            rewrite: None,
        },
        Err(err) => Processed {
            report: FileReport::failed(path.to_path_buf(), format_transform_error(path, source, &err)),
            rewrite: None,
        },
    }
}

/// Appends a `//# sourceMappingURL=` comment on its own line.
fn with_map_comment(code: &str, url: &str) -> String {
    let mut out = String::with_capacity(code.len() + url.len() + 24);
    out.push_str(code);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("//# sourceMappingURL=");
    out.push_str(url);
    out.push('\n');
    out
}

fn write_file(path: &Utf8Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CliError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn print_code(banner: Option<&Utf8Path>, code: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    let result = match banner {
        Some(path) => writeln!(lock, "// {}\n{}", path, code),
        None => write!(lock, "{}", code),
    };
    result.map_err(|source| CliError::Write {
        path: Utf8PathBuf::from("<stdout>"),
        source,
    })
}

/// Writes or prints one rewritten file according to the output flags.
fn emit(args: &Args, file: &SourceFile, rewrite: &RewriteResult) -> Result<(), CliError> {
    if args.check {
        return Ok(());
    }

    let destination = if args.write {
        Some(file.path.clone())
    } else {
        args.out_dir.as_ref().map(|dir| dir.join(&file.relative))
    };

    let Some(destination) = destination else {
        let code = match args.source_map {
            SourceMapMode::Inline => with_map_comment(&rewrite.code, &rewrite.map.to_data_url()?),
            SourceMapMode::None | SourceMapMode::File => rewrite.code.clone(),
        };
        return print_code(Some(&file.path), &code);
    };

    let code = match args.source_map {
        SourceMapMode::None => rewrite.code.clone(),
        SourceMapMode::Inline => with_map_comment(&rewrite.code, &rewrite.map.to_data_url()?),
        SourceMapMode::File => {
            let map_path = Utf8PathBuf::from(format!("{destination}.map"));
            let file_name = destination.file_name().unwrap_or(destination.as_str());
            let map: SourceMapV3 = rewrite.map.clone().with_file(file_name);
            write_file(&map_path, &map.to_json()?)?;
            let map_name = map_path.file_name().unwrap_or(map_path.as_str());
            with_map_comment(&rewrite.code, map_name)
        }
    };

    tracing::debug!(path = %destination, "writing");
    write_file(&destination, &code)
}

/// Transforms stdin and prints the result, rewritten or not.
fn run_stdin(args: &Args) -> Result<RunSummary, CliError> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .map_err(CliError::Stdin)?;

    let path = Utf8PathBuf::from(args.filename.as_deref().unwrap_or(DEFAULT_FILENAME));
    let processed = if has_extension(&path, &args.normalized_extensions()) {
        process_source(&path, &source)
    } else {
        tracing::debug!(path = %path, "extension not selected, passing through");
        Processed {
            report: FileReport::unchanged(path.clone()),
            rewrite: None,
        }
    };

    if !args.check {
        match (&processed.rewrite, args.source_map) {
            (Some(rewrite), SourceMapMode::Inline) => print_code(
                None,
                &with_map_comment(&rewrite.code, &rewrite.map.to_data_url()?),
            )?,
            (Some(rewrite), _) => print_code(None, &rewrite.code)?,
            (None, _) => print_code(None, &source)?,
        }
    }

    Ok(RunSummary {
        files: vec![processed.report],
        check: args.check,
    })
}
