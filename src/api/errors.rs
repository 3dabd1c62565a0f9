//! Mapping of crate [`Error`]s to JSON HTTP error responses.

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::DatabaseErrorKind;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TryFromInto};
use utoipa::{ToResponse, ToSchema};

use crate::helpers::error::{error_chain_message, recursive_error_message};
use crate::service_env::ServiceEnv;
use crate::Error;

/// Message returned when the requested Pokemon does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Pokemon non trouvé";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        let status_code = match self {
            Error::Input { .. } | Error::MissingParameter { .. } => Some(StatusCode::BAD_REQUEST),
            Error::Query { source, .. } => status_code_for_query_error(source),
            _ => None,
        };

        status_code.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns a JSON [`HttpResponse`] built from an [`ErrorResponse`] (see [`ErrorResponse::from`]).
    fn error_response(&self) -> HttpResponse<BoxBody> {
        let error_response: ErrorResponse = self.into();
        HttpResponse::build(error_response.status_code).json(error_response)
    }
}

/// Returns the [`StatusCode`] to use for a [query error](diesel::result::Error) caused by the client.
///
/// A missing record maps to [`NOT_FOUND`](StatusCode::NOT_FOUND); a duplicate `id` or a value
/// rejected by a table constraint maps to [`BAD_REQUEST`](StatusCode::BAD_REQUEST). Any other
/// error returns `None`.
pub fn status_code_for_query_error(error: &diesel::result::Error) -> Option<StatusCode> {
    match error {
        diesel::result::Error::NotFound => Some(StatusCode::NOT_FOUND),
        diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::CheckViolation,
            _,
        ) => Some(StatusCode::BAD_REQUEST),
        _ => None,
    }
}

#[cfg_attr(
    doc,
    doc = r"
        Body of every error response returned by the Pokedex API.

        The [`internal_error`](ErrorResponse::internal_error) field is only populated when
        running in a [`Development`] environment (see [`ErrorResponse::from`]).

        [`Development`]: ServiceEnv::Development
    "
)]
#[cfg_attr(not(doc), doc = "Pokedex API error information")]
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, ToResponse)]
#[response(
    description = "Error",
    example = json!({
        "status_code": 404,
        "error": "Pokemon non trouvé"
    }),
)]
pub struct ErrorResponse {
    /// HTTP status code
    #[serde_as(as = "TryFromInto<u16>")]
    #[schema(value_type = u16, minimum = 100, maximum = 999)]
    pub status_code: StatusCode,

    /// Error message
    pub error: String,

    /// Full internal error chain (when server is running in development)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_error: Option<String>,
}

impl From<&Error> for ErrorResponse {
    /// Creates the [`ErrorResponse`] returned to the client for an internal [`Error`].
    ///
    /// | Error                                   | Status | `error`                       |
    /// |-----------------------------------------|--------|-------------------------------|
    /// | [`Input`](Error::Input)                 | 400    | validation/parsing message    |
    /// | [`MissingParameter`]                    | 400    | `Le paramètre "<name>" est requis` |
    /// | [`Query`](Error::Query) (not found)     | 404    | [`NOT_FOUND_MESSAGE`]         |
    /// | [`Query`](Error::Query) (constraint)    | 400    | database message              |
    /// | anything else                           | 500    | error and its causes, on one line |
    ///
    /// # Examples
    ///
    /// ```
    /// use actix_web::http::StatusCode;
    /// use pokedex_api::api::errors::ErrorResponse;
    /// use pokedex_api::Error;
    ///
    /// let error = Error::missing_parameter("name");
    /// let error_response: ErrorResponse = (&error).into();
    ///
    /// assert_eq!(StatusCode::BAD_REQUEST, error_response.status_code);
    /// assert_eq!("Le paramètre \"name\" est requis", error_response.error);
    /// ```
    ///
    /// [`MissingParameter`]: Error::MissingParameter
    fn from(value: &Error) -> Self {
        Self {
            status_code: value.status_code(),
            error: Self::generate_error_message(value),
            internal_error: Self::generate_internal_error(value),
        }
    }
}

impl ErrorResponse {
    fn generate_error_message(error: &Error) -> String {
        match error {
            Error::Input { source, .. } => source.to_string(),
            Error::MissingParameter { name, .. } => format!("Le paramètre \"{}\" est requis", name),
            Error::Query { source: diesel::result::Error::NotFound, .. } => NOT_FOUND_MESSAGE.into(),
            Error::Query { source: diesel::result::Error::DatabaseError(kind, info), .. }
                if matches!(
                    kind,
                    DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::CheckViolation
                ) =>
            {
                info.message().into()
            },
            error => error_chain_message(error),
        }
    }

    /// Returns `None` unless running in [`Development`](ServiceEnv::Development).
    fn generate_internal_error(error: &Error) -> Option<String> {
        ServiceEnv::current()
            .is_development()
            .then(|| recursive_error_message(error))
    }
}

/// Error handler for `actix_web_validator`'s extractor configs.
///
/// Turns extraction errors into our [`Error`] type so that they produce the same JSON error
/// responses as errors returned by the handlers themselves.
///
/// # Examples
///
/// ```no_run
/// use actix_web_validator::{JsonConfig, PathConfig, QueryConfig};
/// use pokedex_api::api::errors::actix_error_handler;
///
/// let json_config = JsonConfig::default().error_handler(actix_error_handler);
/// let path_config = PathConfig::default().error_handler(actix_error_handler);
/// let query_config = QueryConfig::default().error_handler(actix_error_handler);
/// ```
pub fn actix_error_handler<E, R>(err: E, _req: &R) -> actix_web::error::Error
where
    E: Into<Error>,
{
    Into::<Error>::into(err).into()
}
