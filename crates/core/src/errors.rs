use thiserror::Error;

pub const EMPTY_QUERY_MESSAGE: &str = "Please provide a query";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("{}", EMPTY_QUERY_MESSAGE)]
    EmptyQuery,
    #[error("could not serialize fallback tools: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RecommendError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    /// Text placed in the `error` field of a JSON error body.
    pub fn user_message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::Internal { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl RecommendError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let message = self.to_string();
        match self {
            Self::EmptyQuery => InterfaceError::BadRequest { message, correlation_id },
            Self::Serialization(_) => InterfaceError::Internal { message, correlation_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{InterfaceError, RecommendError, EMPTY_QUERY_MESSAGE};

    #[test]
    fn empty_query_maps_to_bad_request() {
        let interface = RecommendError::EmptyQuery.into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(interface.user_message(), EMPTY_QUERY_MESSAGE);
    }

    #[test]
    fn serialization_failure_maps_to_internal() {
        let interface =
            RecommendError::Serialization("boom".to_owned()).into_interface("req-2");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.correlation_id(), "req-2");
        assert!(interface.user_message().contains("boom"));
    }

    #[test]
    fn empty_query_display_is_the_user_message() {
        assert_eq!(RecommendError::EmptyQuery.to_string(), EMPTY_QUERY_MESSAGE);
    }
}
