//! Template rendering error types.

/// Template rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// No template with this name exists in the asset directory.
    #[error("Template '{name}' not found at '{path}'")]
    NotFound { name: String, path: String },

    /// The name is not a plain file name.
    #[error("Invalid template name '{name}'")]
    InvalidName { name: String },

    /// The template exists but could not be read.
    #[error("Failed to read template '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),
}
