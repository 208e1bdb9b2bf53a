use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid trial id: {0:?}")]
    InvalidTrialId(String),

    #[error("invalid criterion class: {0:?}")]
    InvalidCriterionClass(String),

    #[error("invalid curation column label: {0:?}")]
    InvalidCurationColumn(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
