use thiserror::Error;

use crate::portal::PortalError;
use crate::template::TemplateError;

use super::RelayState;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Portal request failed: {0}")]
    Portal(#[from] PortalError),

    #[error("The chatbot message template is missing for event \"{0}\"")]
    MissingTemplate(String),

    #[error("Invalid chatbot message template for event \"{name}\": {source}")]
    InvalidTemplate {
        name: String,
        #[source]
        source: TemplateError,
    },

    #[error("Relay is not ready (state: {0})")]
    NotReady(RelayState),
}

pub type RelayResult<T> = Result<T, RelayError>;
