use thiserror::Error;

/// Error kinds surfaced by the aggregation pipeline. A failed price or
/// metadata match is not an error — those entities are dropped and logged.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("request to {service} failed")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest_middleware::Error,
    },

    #[error("could not decode {service} response")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected {service} response: {message}")]
    UnexpectedResponse {
        service: &'static str,
        message: String,
    },

    #[error("invalid {service} url")]
    Url {
        service: &'static str,
        #[source]
        source: url::ParseError,
    },
}

impl AggregatorError {
    pub fn network(service: &'static str, source: impl Into<reqwest_middleware::Error>) -> Self {
        Self::Network {
            service,
            source: source.into(),
        }
    }

    pub fn decode(service: &'static str, source: reqwest::Error) -> Self {
        Self::Decode { service, source }
    }

    pub fn unexpected(service: &'static str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            service,
            message: message.into(),
        }
    }

    pub fn url(service: &'static str, source: url::ParseError) -> Self {
        Self::Url { service, source }
    }
}
