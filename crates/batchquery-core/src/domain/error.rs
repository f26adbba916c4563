//! Domain-level error taxonomy for BatchQuery.

/// Rejections raised while adding candidate images.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Only 4 images can be used for comparison.")]
    LimitExceeded,

    #[error("Unsupported image type: {mime_type}")]
    UnsupportedType { mime_type: String },

    #[error("{name} has already been added.")]
    DuplicateImage { name: String },
}

/// Precondition failures for building a dispatchable query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("Please add at least one image.")]
    NoImages,

    #[error("Too many images (max {max}).")]
    TooManyImages { max: usize },
}

/// Result type for intake operations.
pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
