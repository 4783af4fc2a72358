use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// A record file that cannot be used. Any of these aborts the run before
/// dispatch starts.
#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("No record files given")]
    #[diagnostic(code(recordlint::load::no_input))]
    NoInput,

    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(recordlint::load::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}", path.display())]
    #[diagnostic(code(recordlint::load::parse))]
    Parse {
        path: PathBuf,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
        #[source]
        error: serde_json::Error,
    },

    #[error("{} is not a record file: {message} (at '{pointer}')", path.display())]
    #[diagnostic(
        code(recordlint::load::schema),
        help("expected an array of objects, each with a string \"type\" field")
    )]
    Schema {
        path: PathBuf,
        pointer: String,
        message: String,
    },

    #[error("Record {index} ({kind}) in {} could not be decoded", path.display())]
    #[diagnostic(code(recordlint::load::decode))]
    Decode {
        path: PathBuf,
        index: usize,
        kind: String,
        #[source]
        error: serde_json::Error,
    },
}
