use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::core::ErrorBody;

/// Business error reported by the gateway, as one of the well-known backend errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    Unauthenticated,
    InvalidToken,
    TokenExpired,
    InvalidCredentials,
    InvalidRefreshToken,
    Forbidden,
    ValidationFailed,
    InvalidInput,
    InvalidSearchQuery,
    UserNotFound,
    PostNotFound,
    NotificationNotFound,
    FollowRelationNotFound,
    NotFound,
    UsernameExists,
    EmailExists,
    AlreadyExists,
    AlreadyFollowing,
    SelfFollow,
    SelfUnfollow,
    NotificationAccessDenied,
    Internal,
    Other,
}

lazy_static! {
    static ref KNOWN_MESSAGES: HashMap<&'static str, ApiErrorKind> = {
        use ApiErrorKind::*;
        HashMap::from([
            ("unauthenticated", Unauthenticated),
            ("unauthorized", Unauthenticated),
            ("invalid token", InvalidToken),
            ("token expired", TokenExpired),
            ("invalid credentials", InvalidCredentials),
            ("invalid username or password", InvalidCredentials),
            ("invalid refresh token", InvalidRefreshToken),
            ("forbidden", Forbidden),
            ("validation failed", ValidationFailed),
            ("invalid input", InvalidInput),
            ("invalid request", InvalidInput),
            ("invalid search query", InvalidSearchQuery),
            ("user not found", UserNotFound),
            ("post not found", PostNotFound),
            ("notification not found", NotificationNotFound),
            ("follow relation not found", FollowRelationNotFound),
            ("not found", NotFound),
            ("username already exists", UsernameExists),
            ("email already exists", EmailExists),
            ("already exists", AlreadyExists),
            ("already following this user", AlreadyFollowing),
            ("cannot follow yourself", SelfFollow),
            ("cannot unfollow yourself", SelfUnfollow),
            ("access to notification denied", NotificationAccessDenied),
            ("internal server error", Internal),
        ])
    };
}

impl ApiErrorKind {
    /// Classifies an error response. The server message wins when it is one of
    /// the backend's well-known messages, otherwise the status code decides.
    #[must_use]
    pub fn classify(status: StatusCode, message: &str) -> ApiErrorKind {
        let normalized = message.trim().to_lowercase();
        if let Some(kind) = KNOWN_MESSAGES.get(normalized.as_str()) {
            return *kind;
        }
        ApiErrorKind::from_status(status)
    }

    #[must_use]
    pub fn from_status(status: StatusCode) -> ApiErrorKind {
        match status {
            StatusCode::UNAUTHORIZED => ApiErrorKind::Unauthenticated,
            StatusCode::FORBIDDEN => ApiErrorKind::Forbidden,
            StatusCode::NOT_FOUND => ApiErrorKind::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiErrorKind::InvalidInput
            }
            StatusCode::CONFLICT => ApiErrorKind::AlreadyExists,
            s if s.is_server_error() => ApiErrorKind::Internal,
            _ => ApiErrorKind::Other,
        }
    }

    /// True for every "does not exist" flavour, specific or generic
    #[must_use]
    pub fn is_not_found(self) -> bool {
        matches!(
            self,
            ApiErrorKind::NotFound
                | ApiErrorKind::UserNotFound
                | ApiErrorKind::PostNotFound
                | ApiErrorKind::NotificationNotFound
                | ApiErrorKind::FollowRelationNotFound
        )
    }

    /// True for the errors a request with missing or bad credentials may produce
    #[must_use]
    pub fn is_auth_failure(self) -> bool {
        matches!(
            self,
            ApiErrorKind::Unauthenticated
                | ApiErrorKind::InvalidToken
                | ApiErrorKind::TokenExpired
                | ApiErrorKind::InvalidCredentials
                | ApiErrorKind::InvalidRefreshToken
        )
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unable to (de)serialize JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Gateway returned {status} ({kind}): {message}")]
    Api {
        status: StatusCode,
        kind: ApiErrorKind,
        message: String,
    },
    #[error("Required parameter '{0}' is missing")]
    RequiredParameter(String),
}

impl GatewayError {
    pub(crate) fn from_response(status: StatusCode, body: &str) -> GatewayError {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(error_body) => GatewayError::Api {
                status,
                kind: ApiErrorKind::classify(status, &error_body.message),
                message: error_body.message,
            },
            Err(_) => GatewayError::Api {
                status,
                kind: ApiErrorKind::from_status(status),
                message: body.to_string(),
            },
        }
    }

    /// The business error kind, if the gateway answered with an error response
    #[must_use]
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            GatewayError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            GatewayError::Request(e) => e.status(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is(&self, kind: ApiErrorKind) -> bool {
        self.kind() == Some(kind)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind().is_some_and(ApiErrorKind::is_not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_message_wins_over_status() {
        assert_eq!(
            ApiErrorKind::classify(StatusCode::BAD_REQUEST, "Cannot follow yourself"),
            ApiErrorKind::SelfFollow
        );
        assert_eq!(
            ApiErrorKind::classify(StatusCode::CONFLICT, "username already exists"),
            ApiErrorKind::UsernameExists
        );
        assert_eq!(
            ApiErrorKind::classify(StatusCode::NOT_FOUND, " notification not found "),
            ApiErrorKind::NotificationNotFound
        );
    }

    #[test]
    fn unknown_message_falls_back_to_status() {
        assert_eq!(
            ApiErrorKind::classify(StatusCode::CONFLICT, "duplicate key value"),
            ApiErrorKind::AlreadyExists
        );
        assert_eq!(
            ApiErrorKind::classify(StatusCode::BAD_GATEWAY, "upstream down"),
            ApiErrorKind::Internal
        );
        assert_eq!(
            ApiErrorKind::classify(StatusCode::IM_A_TEAPOT, ""),
            ApiErrorKind::Other
        );
    }

    #[test]
    fn substring_is_not_a_match() {
        // "user not found for id 3" must not be mistaken for anything more specific
        assert_eq!(
            ApiErrorKind::classify(StatusCode::NOT_FOUND, "user not found for id 3"),
            ApiErrorKind::NotFound
        );
    }

    #[test]
    fn from_response_parses_error_body() {
        let err = GatewayError::from_response(
            StatusCode::CONFLICT,
            r#"{"status": 409, "message": "already following this user"}"#,
        );
        assert!(err.is(ApiErrorKind::AlreadyFollowing));
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_family() {
        assert!(ApiErrorKind::PostNotFound.is_not_found());
        assert!(ApiErrorKind::NotFound.is_not_found());
        assert!(!ApiErrorKind::Forbidden.is_not_found());
        assert!(ApiErrorKind::InvalidToken.is_auth_failure());
    }
}
