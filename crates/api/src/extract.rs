//! Request extractors

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use daybook_core::schedule::SyncContext;
use daybook_domain::{CalendarCredentials, DaybookError};

use crate::errors::ApiError;

pub const CALENDAR_ID_HEADER: &str = "x-calendar-id";
pub const TIME_ZONE_HEADER: &str = "x-time-zone";

/// Calendar credentials and zone taken from request headers.
///
/// - `Authorization: Bearer <token>` enables mirroring; without it calendar
///   sync is skipped.
/// - `X-Calendar-Id` selects a calendar other than the configured default.
/// - `X-Time-Zone` is an IANA zone name for event timestamps.
#[derive(Debug, Clone, Default)]
pub struct CalendarContext(pub SyncContext);

impl<S> FromRequestParts<S> for CalendarContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        sync_context(&parts.headers).map(CalendarContext).map_err(ApiError)
    }
}

fn sync_context(headers: &HeaderMap) -> Result<SyncContext, DaybookError> {
    let credentials = match header_value(headers, AUTHORIZATION.as_str())? {
        None => None,
        Some(raw) => {
            let token = bearer_token(raw)?;
            Some(CalendarCredentials {
                access_token: token.to_string(),
                calendar_id: header_value(headers, CALENDAR_ID_HEADER)?.map(str::to_string),
            })
        }
    };

    let time_zone = header_value(headers, TIME_ZONE_HEADER)?.map(str::to_string);

    Ok(SyncContext { credentials, time_zone })
}

fn bearer_token(raw: &str) -> Result<&str, DaybookError> {
    match raw.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token.trim()),
        _ => Err(DaybookError::Auth("Authorization header must use the Bearer scheme".into())),
    }
}

/// Trimmed header value; blank values count as absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, DaybookError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let text = value
        .to_str()
        .map_err(|_| DaybookError::Validation(format!("header {name} is not valid text")))?
        .trim();
    Ok((!text.is_empty()).then_some(text))
}
