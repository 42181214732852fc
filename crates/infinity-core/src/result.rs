use crate::error::InfinityError;

pub type InfinityResult<T> = Result<T, InfinityError>;
