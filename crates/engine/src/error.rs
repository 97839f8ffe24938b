use presence_core::error::CoreError;
use presence_db::StoreError;

/// Failure of an engine operation: a broken domain rule or a storage error.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Convert `validator` failures into a domain validation error.
pub(crate) fn validation(errors: validator::ValidationErrors) -> EngineError {
    EngineError::Core(CoreError::Validation(errors.to_string()))
}
