//! Conversions from external infrastructure errors into domain errors.

use daybook_domain::DaybookError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DaybookError);

impl From<InfraError> for DaybookError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DaybookError> for InfraError {
    fn from(value: DaybookError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDaybookError {
    fn into_daybook(self) -> DaybookError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → DaybookError */
/* -------------------------------------------------------------------------- */

impl IntoDaybookError for SqlError {
    fn into_daybook(self) -> DaybookError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => DaybookError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        DaybookError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        DaybookError::Conflict("unique constraint violation".into())
                    }
                    _ => DaybookError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => DaybookError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                DaybookError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                DaybookError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => DaybookError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidPath(path) => DaybookError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => DaybookError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_daybook())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → DaybookError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(DaybookError::Database(format!("failed to get connection from pool: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → DaybookError */
/* -------------------------------------------------------------------------- */

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(DaybookError::Database(format!("stored document is not valid JSON: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DaybookError */
/* -------------------------------------------------------------------------- */

impl IntoDaybookError for HttpError {
    fn into_daybook(self) -> DaybookError {
        if self.is_timeout() {
            return DaybookError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return DaybookError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status.as_u16(), status.canonical_reason().unwrap_or("unknown status"));
        }

        DaybookError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_daybook())
    }
}

/// Map an upstream HTTP status to the domain taxonomy.
pub fn status_error(code: u16, detail: &str) -> DaybookError {
    let message = format!("HTTP {code} {detail}");
    match code {
        401 | 403 => DaybookError::Auth(message),
        404 | 410 => DaybookError::NotFound(message),
        429 => DaybookError::Quota(message),
        _ => DaybookError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: DaybookError = InfraError::from(err).into();
        match mapped {
            DaybookError::Database(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_document_maps_to_database_error() {
        let err = serde_json::from_str::<Vec<u64>>("{not json").unwrap_err();
        let mapped: DaybookError = InfraError::from(err).into();
        assert!(matches!(mapped, DaybookError::Database(_)));
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert!(matches!(status_error(403, "Forbidden"), DaybookError::Auth(_)));
        assert!(matches!(status_error(410, "Gone"), DaybookError::NotFound(_)));
        assert!(matches!(status_error(429, "Too Many Requests"), DaybookError::Quota(_)));
        assert!(matches!(status_error(503, "Service Unavailable"), DaybookError::Network(_)));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: DaybookError = InfraError::from(error).into();
        match mapped {
            DaybookError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }
}
