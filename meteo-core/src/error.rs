use thiserror::Error;

/// Shown to the user whenever the provider could not be reached at all.
pub const NO_CONNECTION_MESSAGE: &str = "Нет подключения к интернету. Проверьте соединение.";

/// Errors produced while fetching or presenting weather data.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The host could not be resolved, the connection was refused or timed out.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-2xx status.
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The body did not match the expected JSON shape.
    #[error("failed to decode provider response: {0}")]
    Decode(String),

    /// The request could not be built or sent for a reason other than connectivity.
    #[error("request failed: {0}")]
    Request(String),

    /// A forecast timestamp was not in `YYYY-MM-DD HH:MM:SS` form.
    #[error("malformed forecast timestamp: {input:?}")]
    Format { input: String },
}

impl WeatherError {
    pub fn is_network(&self) -> bool {
        matches!(self, WeatherError::Network(_))
    }

    /// Text for the error card: a dedicated message for connectivity
    /// failures, `"Ошибка: <details>"` for everything else.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Network(_) => NO_CONNECTION_MESSAGE.to_string(),
            other => format!("Ошибка: {other}"),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        let message = describe_chain(&err);

        if err.is_connect() || err.is_timeout() {
            WeatherError::Network(message)
        } else if err.is_decode() {
            WeatherError::Decode(message)
        } else if let Some(status) = err.status() {
            WeatherError::Provider { status: status.as_u16(), message }
        } else {
            WeatherError::Request(message)
        }
    }
}

/// `"outer: cause: root cause"`. reqwest keeps the useful part of a
/// transport failure in the source chain, not in its own `Display`.
fn describe_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_gets_dedicated_message() {
        let err = WeatherError::Network("connection refused".into());
        assert!(err.is_network());
        assert_eq!(err.user_message(), NO_CONNECTION_MESSAGE);
    }

    #[test]
    fn provider_error_is_prefixed() {
        let err = WeatherError::Provider { status: 401, message: "Invalid API key".into() };
        assert!(!err.is_network());
        assert_eq!(err.user_message(), "Ошибка: provider returned 401: Invalid API key");
    }

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn chain_keeps_every_cause() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"));
        assert_eq!(describe_chain(&err), "error sending request: connection refused");
    }

    #[test]
    fn chain_of_single_error_is_its_display() {
        let err = std::io::Error::other("boom");
        assert_eq!(describe_chain(&err), "boom");
    }

    #[test]
    fn decode_error_from_serde() {
        let serde_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = WeatherError::from(serde_err);
        assert!(matches!(err, WeatherError::Decode(_)));
        assert!(err.user_message().starts_with("Ошибка: failed to decode"));
    }
}
