use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GessoError {
    #[error("template has no YAML frontmatter (missing --- delimiters)")]
    NoFrontmatter,
    #[error("template has no fields to collect (all fields are reserved or empty)")]
    NoFieldsToCollect,
    #[error("template not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },
    #[error("failed to read template: {0}")]
    TemplateRead(std::io::Error),
    #[error("failed to read input file: {0}")]
    InputRead(std::io::Error),
    #[error("failed to create output directory: {0}")]
    OutputDirCreation(std::io::Error),
    #[error("failed to write note: {0}")]
    FileWrite(std::io::Error),
}

pub type GessoResult<T> = std::result::Result<T, GessoError>;
