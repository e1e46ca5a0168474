//! Shared HTTP plumbing for network sources.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::errors::SourceError;

const USER_AGENT: &str = concat!("jurisdesk/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Maps the response status onto the source error taxonomy.
///
/// `404` is returned as `Ok(None)`: for every source we talk to it means the
/// case is unknown rather than that the request was wrong.
pub(crate) fn check_status(
    source_id: &str,
    response: Response,
) -> Result<Option<Response>, SourceError> {
    let status = response.status();

    if status.is_success() {
        return Ok(Some(response));
    }

    match status {
        StatusCode::NOT_FOUND => Ok(None),
        StatusCode::TOO_MANY_REQUESTS => Err(SourceError::RateLimited {
            source_id: source_id.to_string(),
        }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SourceError::Unauthorized {
            source_id: source_id.to_string(),
        }),
        _ => Err(SourceError::Status {
            source_id: source_id.to_string(),
            status: status.as_u16(),
        }),
    }
}
