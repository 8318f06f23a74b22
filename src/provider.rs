use std::fmt;

use crate::http::FetchError;

/// What a provider call produced: an HTTP-style status code plus a payload.
/// 200 means success; any other code is a failure whose payload is diagnostic
/// text that must not be shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub code: u16,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Lines(Vec<String>),
}

impl Outcome {
    pub fn success(payload: Payload) -> Self {
        Outcome { code: 200, payload }
    }

    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Outcome {
            code,
            payload: Payload::Text(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 200
    }

    /// Collapse a provider call into the (code, payload) pair the dispatcher
    /// consumes. Errors become non-200 outcomes carrying diagnostic text.
    pub fn from_result(result: ProviderResult) -> Outcome {
        match result {
            Ok(payload) => Outcome::success(payload),
            Err(err) => Outcome::failure(err.code(), err.message()),
        }
    }
}

pub type ProviderResult = Result<Payload, ProviderError>;

/// Why a provider call failed: the upstream status when we got one, 404 when
/// the page parsed but held no match, 502 for transport errors.
#[derive(Debug)]
pub enum ProviderError {
    Http(u16, String),
    NotFound(String),
    Transport(String),
}

impl ProviderError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ProviderError::NotFound(what.into())
    }

    pub fn code(&self) -> u16 {
        match self {
            ProviderError::Http(code, _) => *code,
            ProviderError::NotFound(_) => 404,
            ProviderError::Transport(_) => 502,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ProviderError::Http(_, msg) => msg.clone(),
            ProviderError::NotFound(msg) => msg.clone(),
            ProviderError::Transport(msg) => msg.clone(),
        }
    }
}

impl From<FetchError> for ProviderError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status(code) => ProviderError::Http(code, format!("upstream returned {}", code)),
            FetchError::Transport(e) => ProviderError::Transport(format!("{:#}", e)),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ProviderError {}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Lines(lines) => f.write_str(&lines.join("\n")),
        }
    }
}

/// Catalog lookup by id, with two independent magnet filters.
pub trait IdLookup {
    fn av_by_id(&self, id: &str, nice_only: bool, uncensored_only: bool) -> Outcome;
}

/// Performer search. Each implementation serves one mode: DMM returns
/// top-rated works, JavBus returns the newest catalog ids.
pub trait StarSearch {
    fn avs_by_star(&self, name: &str) -> Outcome;
}

/// Actress popularity ranking.
pub trait StarRanking {
    fn top_stars(&self) -> Outcome;
}

/// Preview video lookup by id.
pub trait PreviewVideo {
    fn pv_by_id(&self, id: &str) -> Outcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_payload_renders_one_per_line() {
        let payload = Payload::Lines(vec!["a".into(), "b".into()]);
        assert_eq!(payload.to_string(), "a\nb");
    }

    #[test]
    fn non_200_is_failure() {
        assert!(Outcome::success(Payload::Text("ok".into())).is_success());
        assert!(!Outcome::failure(404, "not found").is_success());
    }

    #[test]
    fn not_found_maps_to_404() {
        let outcome = Outcome::from_result(Err(ProviderError::not_found("no match for id")));
        assert_eq!(outcome.code, 404);
        assert_eq!(outcome.payload, Payload::Text("no match for id".into()));
    }
}
