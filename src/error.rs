//! Error types for the promptlift pipeline
//!
//! [`ClientError`] describes failures of the LLM collaborator itself.
//! [`OptimizerError`] is what the analysis and optimization pipeline
//! surfaces to callers: either the input was rejected up front, or the
//! collaborator stayed unavailable after its own retries.

use std::fmt;

/// Failure of the LLM backend, as seen by the client that calls it
#[derive(Debug)]
pub enum ClientError {
    /// The request never got an HTTP answer
    Network(NetworkError),
    /// The backend answered with an error status or an unusable body
    Api(ApiError),
    /// Credentials are missing or were refused
    Authentication(AuthError),
    /// Local settings are unusable; raised before any request is sent
    Configuration(ConfigError),
    /// The response body was not the JSON the protocol promises
    Parse(ParseError),
}

#[derive(Debug)]
pub struct NetworkError {
    pub message: String,
    pub error_type: NetworkErrorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorType {
    Timeout,
    ConnectionFailed,
    Other,
}

#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: Option<u16>,
    pub error_type: ApiErrorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorType {
    RateLimit,
    ServerError,
    BadRequest,
    /// 2xx answer whose first choice has no text
    EmptyResponse,
    Other,
}

#[derive(Debug)]
pub struct AuthError {
    pub message: String,
    pub error_type: AuthErrorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorType {
    InvalidApiKey,
    MissingApiKey,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    /// Setting or environment variable at fault
    pub parameter: Option<String>,
}

#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub error_type: ParseErrorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorType {
    JsonParsing,
}

impl ClientError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Network(NetworkError {
            message: message.into(),
            error_type: NetworkErrorType::Timeout,
        })
    }

    /// HTTP 429
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::Api(ApiError {
            message: message.into(),
            status_code: Some(429),
            error_type: ApiErrorType::RateLimit,
        })
    }

    /// 5xx answer
    pub fn server(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api(ApiError {
            message: message.into(),
            status_code: Some(status_code),
            error_type: ApiErrorType::ServerError,
        })
    }

    pub fn invalid_api_key(message: impl Into<String>) -> Self {
        Self::Authentication(AuthError {
            message: message.into(),
            error_type: AuthErrorType::InvalidApiKey,
        })
    }

    pub fn missing_api_key(message: impl Into<String>) -> Self {
        Self::Authentication(AuthError {
            message: message.into(),
            error_type: AuthErrorType::MissingApiKey,
        })
    }

    pub fn config(message: impl Into<String>, parameter: Option<String>) -> Self {
        Self::Configuration(ConfigError {
            message: message.into(),
            parameter,
        })
    }

    pub fn json_parse(message: impl Into<String>) -> Self {
        Self::Parse(ParseError {
            message: message.into(),
            error_type: ParseErrorType::JsonParsing,
        })
    }

    /// Classify a non-2xx status; `body` is kept for the message
    pub fn from_status(status_code: u16, body: &str) -> Self {
        match status_code {
            401 | 403 => ClientError::invalid_api_key(format!("Request rejected ({status_code}): {body}")),
            429 => ClientError::rate_limit(format!("Rate limit exceeded: {body}")),
            code if code >= 500 => ClientError::server(code, format!("Server error: {body}")),
            code if code >= 400 => ClientError::Api(ApiError {
                message: format!("Bad request: {body}"),
                status_code: Some(code),
                error_type: ApiErrorType::BadRequest,
            }),
            code => ClientError::Api(ApiError {
                message: format!("Unexpected status: {body}"),
                status_code: Some(code),
                error_type: ApiErrorType::Other,
            }),
        }
    }

    /// Transient failures: timeouts, refused connections, 429 and 5xx
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(NetworkError { error_type, .. }) => *error_type != NetworkErrorType::Other,
            ClientError::Api(ApiError { error_type, .. }) => {
                matches!(error_type, ApiErrorType::RateLimit | ApiErrorType::ServerError)
            }
            ClientError::Authentication(_) | ClientError::Configuration(_) | ClientError::Parse(_) => false,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, detail, message) = match self {
            ClientError::Network(e) => ("Network error", None, &e.message),
            ClientError::Api(e) => ("API error", e.status_code.map(|s| s.to_string()), &e.message),
            ClientError::Authentication(e) => ("Authentication error", None, &e.message),
            ClientError::Configuration(e) => ("Configuration error", e.parameter.clone(), &e.message),
            ClientError::Parse(e) => ("Parse error", None, &e.message),
        };
        match detail {
            Some(detail) => write!(f, "{kind} ({detail}): {message}"),
            None => write!(f, "{kind}: {message}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let host = err.url().and_then(|u| u.host_str()).unwrap_or("the LLM backend").to_string();
        if err.is_timeout() {
            ClientError::timeout(format!("no answer from {host} before the timeout"))
        } else if err.is_connect() {
            ClientError::Network(NetworkError {
                message: format!("could not connect to {host}"),
                error_type: NetworkErrorType::ConnectionFailed,
            })
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16(), &err.to_string())
        } else if err.is_decode() {
            ClientError::json_parse(format!("undecodable completion body: {err}"))
        } else {
            ClientError::Network(NetworkError {
                message: err.to_string(),
                error_type: NetworkErrorType::Other,
            })
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::json_parse(err.to_string())
    }
}

/// Errors surfaced by the analysis and optimization pipeline
#[derive(Debug)]
pub enum OptimizerError {
    /// Prompt text was empty, too long, or otherwise rejected before any LLM call
    InvalidInput { message: String },
    /// The LLM collaborator failed after its own retries
    ServiceUnavailable(ClientError),
}

impl OptimizerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// True when the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, OptimizerError::ServiceUnavailable(_))
    }
}

impl fmt::Display for OptimizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            OptimizerError::ServiceUnavailable(err) => write!(f, "AI service unavailable: {}", err),
        }
    }
}

impl std::error::Error for OptimizerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptimizerError::ServiceUnavailable(err) => Some(err),
            OptimizerError::InvalidInput { .. } => None,
        }
    }
}

impl From<ClientError> for OptimizerError {
    fn from(err: ClientError) -> Self {
        OptimizerError::ServiceUnavailable(err)
    }
}
