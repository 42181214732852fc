use crate::model::ModelId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfinityError {
    #[error("a resource name is required to create an infinity model")]
    MissingResourceName,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown infinity model: {0}")]
    UnknownModel(ModelId),

    #[error("store error: {0}")]
    Store(String),
}
