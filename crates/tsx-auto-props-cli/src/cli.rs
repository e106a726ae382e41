//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Path argument that reads the source from stdin.
pub const STDIN_PATH: &str = "-";

/// Attach type-derived `props` metadata to Vue `defineComponent` calls in TSX files.
#[derive(Debug, Parser)]
#[command(name = "vue-tsx-auto-props")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to process (`-` reads stdin)
    #[arg(default_value = ".")]
    pub paths: Vec<Utf8PathBuf>,

    /// File extensions to transform
    #[arg(long = "extension", value_name = "EXT", default_value = "tsx")]
    pub extensions: Vec<String>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Overwrite files in place
    #[arg(long, conflicts_with_all = ["out_dir", "check"])]
    pub write: bool,

    /// Write rewritten files into a mirror tree under this directory
    #[arg(long = "out-dir", value_name = "DIR", conflicts_with = "check")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Source map emission
    #[arg(long = "source-map", value_enum, default_value = "none")]
    pub source_map: SourceMapMode,

    /// Write nothing; exit with an error if any file would be rewritten
    #[arg(long)]
    pub check: bool,

    /// Summary format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// File name reported for stdin input
    #[arg(long)]
    pub filename: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Summary format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

/// Where source maps go.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum SourceMapMode {
    /// No source maps (default)
    #[default]
    None,
    /// A `<file>.map` next to each written file
    File,
    /// An inline `data:` URL comment at the end of each file
    Inline,
}

impl Args {
    /// Returns whether the input comes from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.paths.len() == 1 && self.paths[0] == STDIN_PATH
    }

    /// Returns whether rewritten code is printed to stdout.
    pub fn prints_code(&self) -> bool {
        !self.write && self.out_dir.is_none() && !self.check
    }

    /// Extensions without a leading dot.
    pub fn normalized_extensions(&self) -> Vec<&str> {
        self.extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    /// Checks combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.paths.iter().any(|p| p == STDIN_PATH) && !self.reads_stdin() {
            return Err("`-` cannot be combined with other paths".to_string());
        }
        if self.reads_stdin() && (self.write || self.out_dir.is_some()) {
            return Err("stdin input can only be printed or checked".to_string());
        }
        if self.source_map == SourceMapMode::File && self.prints_code() {
            return Err("`--source-map file` needs `--write` or `--out-dir`".to_string());
        }
        if self.filename.is_some() && !self.reads_stdin() {
            return Err("`--filename` only applies to stdin input".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["vue-tsx-auto-props"]);
        assert_eq!(args.paths, vec![Utf8PathBuf::from(".")]);
        assert_eq!(args.extensions, vec!["tsx".to_string()]);
        assert_eq!(args.output, OutputFormat::Human);
        assert_eq!(args.source_map, SourceMapMode::None);
        assert!(args.prints_code());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_repeated_extensions() {
        let args = Args::parse_from([
            "vue-tsx-auto-props",
            "--extension",
            "tsx",
            "--extension",
            ".jsx",
        ]);
        assert_eq!(args.normalized_extensions(), vec!["tsx", "jsx"]);
    }

    #[test]
    fn test_output_formats() {
        let args = Args::parse_from(["vue-tsx-auto-props", "--output", "json"]);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_write_conflicts_with_check() {
        let result = Args::try_parse_from(["vue-tsx-auto-props", "--write", "--check"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_stdin() {
        let args = Args::parse_from(["vue-tsx-auto-props", "-", "--filename", "App.tsx"]);
        assert!(args.reads_stdin());
        assert!(args.validate().is_ok());

        let args = Args::parse_from(["vue-tsx-auto-props", "-", "src"]);
        assert!(args.validate().is_err());

        let args = Args::parse_from(["vue-tsx-auto-props", "-", "--write"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_source_map_file_needs_output_files() {
        let args = Args::parse_from(["vue-tsx-auto-props", "--source-map", "file"]);
        assert!(args.validate().is_err());

        let args = Args::parse_from(["vue-tsx-auto-props", "--source-map", "file", "--write"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_filename_requires_stdin() {
        let args = Args::parse_from(["vue-tsx-auto-props", "src", "--filename", "App.tsx"]);
        assert!(args.validate().is_err());
    }
}
