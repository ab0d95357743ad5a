use thiserror::Error;

/// Errors raised by the crate itself and pushed through a subscriber's `error`
/// channel.
///
/// Producers are free to push any error type; these variants cover the cases
/// the crate has to report on its own behalf.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservableError {
    /// The producer function panicked while `subscribe` was running it.
    #[error("observable producer panicked: {message}")]
    ProducerPanicked { message: String },

    /// Ad-hoc error for producers that have nothing more specific to report.
    #[error("{0}")]
    Custom(String),
}

impl ObservableError {
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        ObservableError::ProducerPanicked { message }
    }
}
