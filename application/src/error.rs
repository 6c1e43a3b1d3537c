//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use serde::Serialize;
use service::{infra::database, Categorize, ErrorKind};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// HTTP API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Creates a new [`Error`] of the provided [`ErrorKind`].
    ///
    /// [`None`] is returned for [`ErrorKind::Collaborator`] errors, as they
    /// are internal ones.
    #[must_use]
    pub fn of_kind(kind: ErrorKind, msg: &impl ToString) -> Option<Self> {
        let (code, status_code) = match kind {
            ErrorKind::Validation => {
                ("VALIDATION_FAILED", http::StatusCode::BAD_REQUEST)
            }
            ErrorKind::NotFound => ("NOT_FOUND", http::StatusCode::NOT_FOUND),
            ErrorKind::InconsistentState => {
                ("INCONSISTENT_STATE", http::StatusCode::CONFLICT)
            }
            ErrorKind::Collaborator => return None,
        };
        Some(Self {
            code,
            status_code,
            message: msg.to_string(),
            backtrace: None,
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

/// JSON body of an [`Error`] response.
#[derive(Debug, Serialize)]
struct Body<'e> {
    /// [`Error`] code.
    code: Code,

    /// [`Error`] message.
    message: &'e str,

    /// Frames of the [`Error`] backtrace.
    backtrace: Vec<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            tracing::error!("{self}");
        }

        let body = Body {
            code: self.code,
            message: &self.message,
            backtrace: self
                .backtrace
                .iter()
                .flat_map(|trace| trace.iter())
                .map(ToString::to_string)
                .collect(),
        };
        (self.status_code, Json(body)).into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

/// Implements [`AsError`] for the provided [`Categorize`]d errors, deriving
/// the [`Error`] from their [`ErrorKind`].
macro_rules! impl_as_error_by_kind {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsError for $ty {
                fn try_as_error(&self) -> Option<Error> {
                    Error::of_kind(self.kind(), self)
                }
            }
        )*
    };
}

impl_as_error_by_kind!(
    database::Error,
    service::command::cascade_property_status::ExecutionError,
    service::command::create_property::ExecutionError,
    service::command::create_sale::ExecutionError,
    service::command::delete_property::ExecutionError,
    service::command::delete_sale::ExecutionError,
    service::command::mark_notification_as_read::ExecutionError,
    service::command::save_goal::ExecutionError,
    service::command::toggle_collection_status::ExecutionError,
    service::command::update_property::ExecutionError,
    service::command::update_sale::ExecutionError,
);

/// Implements [`AsError`] and [`From`] for the provided [`axum`] extractor
/// rejections, treating them as malformed requests.
macro_rules! impl_as_error_for_rejection {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsError for $ty {
                fn try_as_error(&self) -> Option<Error> {
                    Some(Error {
                        code: "BAD_REQUEST",
                        status_code: http::StatusCode::BAD_REQUEST,
                        message: self.body_text(),
                        backtrace: None,
                    })
                }
            }

            impl From<$ty> for Error {
                fn from(rejection: $ty) -> Self {
                    rejection.into_error()
                }
            }
        )*
    };
}

impl_as_error_for_rejection!(JsonRejection, PathRejection, QueryRejection);

#[cfg(test)]
mod spec {
    use service::ErrorKind;

    use super::Error;

    #[test]
    fn maps_kinds_onto_status_codes() {
        for (kind, status) in [
            (ErrorKind::Validation, http::StatusCode::BAD_REQUEST),
            (ErrorKind::NotFound, http::StatusCode::NOT_FOUND),
            (ErrorKind::InconsistentState, http::StatusCode::CONFLICT),
        ] {
            let err = Error::of_kind(kind, &"boom").unwrap();
            assert_eq!(err.status_code, status);
            assert_eq!(err.message, "boom");
        }

        assert!(Error::of_kind(ErrorKind::Collaborator, &"boom").is_none());
    }

    #[test]
    fn displays_code_and_message() {
        let err = Error::internal(&"database is down");

        assert_eq!(
            err.to_string(),
            "[INTERNAL_SERVER_ERROR]: database is down",
        );
    }
}
