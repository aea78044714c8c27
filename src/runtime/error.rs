use crate::binding::BindError;
use crate::transport::RequestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Request(#[from] RequestError),

    #[error(transparent)]
    Bind(#[from] BindError),
}
