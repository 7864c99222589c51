use reqwest::StatusCode;
use thiserror::Error;

/// Failure modes when talking to an external service.
///
/// `Transport` covers requests that never produced a usable response,
/// `Status` covers non-2xx replies, and `Shape` covers bodies that decode
/// but do not have the structure the caller needs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("unexpected {service} response shape: {detail}")]
    Shape { service: &'static str, detail: String },
}

impl FetchError {
    pub(crate) fn transport(service: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { service, source }
    }

    pub(crate) fn status(service: &'static str, status: StatusCode, body: &str) -> Self {
        Self::Status { service, status, body: truncate_body(body) }
    }

    pub(crate) fn shape(service: &'static str, detail: impl Into<String>) -> Self {
        Self::Shape { service, detail: detail.into() }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_truncates_long_bodies() {
        let body = "x".repeat(500);
        let err = FetchError::status("visualcrossing", StatusCode::NOT_FOUND, &body);

        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("..."));
        assert!(msg.len() < 300);
    }

    #[test]
    fn status_error_keeps_short_bodies() {
        let err = FetchError::status("giphy", StatusCode::FORBIDDEN, "bad key");
        assert!(err.to_string().contains("bad key"));
    }
}
