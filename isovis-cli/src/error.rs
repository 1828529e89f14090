//! Error handling for the isovis CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for isovis CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Isoform not found: {id}")]
    IsoformNotFound { id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn parse<S: Into<String>>(file: S, message: S) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn isoform_not_found<S: Into<String>>(id: S) -> Self {
        Self::IsoformNotFound { id: id.into() }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file\n\
                 • Compressed record files need a .gz extension",
                path.display()
            ));
        }

        CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Records must be a JSON array or an object with an \"isoforms\" array\n\
                 • Each record needs id, strand (\"+\" or \"-\") and exon_ranges\n\
                 • Exon ranges are [start, end] pairs with start <= end\n\
                 • Modification sites are BED lines with end = start + 1 and a gene id in column 4",
            );
        }

        CliError::IsoformNotFound { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Version suffixes are dropped from ids (ENST0001.3 is read as ENST0001)\n\
                 • Use 'isovis junctions' to list the loaded isoforms",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your isovis.toml configuration file\n\
                 • Use 'isovis config --example' to generate a sample configuration\n\
                 • Verify that all configuration values are valid",
            );
        }

        CliError::Io { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check that the output directory exists\n\
                 • Ensure you have write permissions for the output path",
            );
        }

        CliError::Validation { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Zoom windows are written START-END, e.g. --zoom 1200-5400\n\
                 • Plot widths must be positive\n\
                 • --levels needs both --sites and --gene",
            );
        }
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("records.json"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_missing_isoform_mentions_versions() {
        let formatted = format_error_with_suggestions(&CliError::isoform_not_found("ENST0001"));
        assert!(formatted.starts_with("Isoform not found: ENST0001"));
        assert!(formatted.contains("Version suffixes"));
    }

    #[test]
    fn test_write_failure_suggestion() {
        let formatted = format_error_with_suggestions(&CliError::io("Failed to write out.json"));
        assert!(formatted.starts_with("Input/Output error: Failed to write out.json"));
        assert!(formatted.contains("write permissions"));
    }
}
