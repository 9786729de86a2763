#![forbid(unsafe_code)]

use std::io::{self, Read};

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::context::{PredictRequest, PredictionContext};
use crate::error::GenerationError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Status, content type and body of a reply, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header value
    pub content_type: &'static str,
    /// response body
    pub body: String,
}

impl Reply {
    fn text(status: u16, body: &str) -> Self {
        Self { status, content_type: "text/plain; charset=utf-8", body: body.to_string() }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, content_type: "application/json", body },
            Err(e) => Self::text(500, &e.to_string()),
        }
    }

    fn error(status: u16, message: String) -> Self {
        Self::json(status, &ErrorBody { error: message })
    }

    fn failure(err: &GenerationError) -> Self {
        Self::error(500, err.to_string())
    }
}

/// Why a body never reached the router.
#[derive(Debug)]
pub enum BodyError {
    /// More than the configured number of bytes
    TooLarge(usize),
    /// The connection failed mid-body
    Unreadable(io::Error),
}

/// Read at most `limit` bytes of body; one byte more is [`BodyError::TooLarge`].
pub fn read_body<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>, BodyError> {
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut body = Vec::new();
    reader.take(cap).read_to_end(&mut body).map_err(BodyError::Unreadable)?;
    if body.len() > limit {
        return Err(BodyError::TooLarge(limit));
    }
    Ok(body)
}

/// Parse a JSON request body. Only objects and arrays are accepted and an
/// empty body reads as `{}`.
fn parse_json(body: &[u8]) -> Result<serde_json::Value, String> {
    if body.is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    match serde_json::from_slice(body) {
        Ok(v @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => Ok(v),
        Ok(_) => Err("body must be a JSON object".to_string()),
        Err(e) => Err(format!("malformed JSON body: {e}")),
    }
}

/// Route one request.
///
/// - `GET /health` → 200 `OK`
/// - `POST /predict` → 200 `{"predicted_text": ...}`; 400 `{"error": ...}`
///   when the body is not JSON; 500 `{"error": ...}` when the JSON is not a
///   valid request or generation fails
/// - anything else → 404
pub fn handle(ctx: &PredictionContext, method: &Method, url: &str, body: &[u8]) -> Reply {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Get, "/health") => Reply::text(200, "OK"),
        (Method::Post, "/predict") => {
            let json = match parse_json(body) {
                Ok(json) => json,
                Err(msg) => {
                    log::warn!("rejected body: {msg}");
                    return Reply::error(400, msg);
                }
            };
            let result = if json.is_object() {
                serde_json::from_value::<PredictRequest>(json)
                    .map_err(|e| GenerationError::InvalidRequest(e.to_string()))
            } else {
                Err(GenerationError::InvalidRequest("body is not an object".into()))
            }
            .and_then(|req| ctx.predict(&req));
            match result {
                Ok(resp) => Reply::json(200, &resp),
                Err(err) => {
                    log::warn!("prediction failed: {err}");
                    Reply::failure(&err)
                }
            }
        }
        _ => Reply::text(404, "Not Found"),
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

/// Read the body of `request` (at most `max_body_bytes`), route it and send
/// the reply.
pub fn serve(ctx: &PredictionContext, mut request: Request, max_body_bytes: usize) {
    let method = request.method().clone();
    let url = request.url().to_string();
    let reply = match read_body(request.as_reader(), max_body_bytes) {
        Ok(body) => handle(ctx, &method, &url, &body),
        Err(BodyError::TooLarge(limit)) => {
            // discard the rest unbuffered so the client reads the 413, not a reset
            if let Err(e) = io::copy(request.as_reader(), &mut io::sink()) {
                log::debug!("draining oversized body: {e}");
            }
            Reply::error(413, format!("request body exceeds {limit} bytes"))
        }
        Err(BodyError::Unreadable(e)) => Reply::error(400, format!("unreadable body: {e}")),
    };
    log::debug!("{method} {url} -> {}", reply.status);

    let mut response = Response::from_string(reply.body).with_status_code(StatusCode(reply.status));
    for h in [header("Content-Type", reply.content_type), header("Access-Control-Allow-Origin", "*")]
        .into_iter()
        .flatten()
    {
        response.add_header(h);
    }
    if let Err(e) = request.respond(response) {
        log::error!("failed to send response for {method} {url}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::error::ScoreError;
    use tokenize::{IndexStrategy, Vocabulary, WordTokenizer};

    fn ctx(fail: bool) -> PredictionContext {
        let vocab = Vocabulary::build(&["the cat sat", "the cat ran"], &WordTokenizer, IndexStrategy::Sequential);
        let scorer = move |_: &[usize]| -> Result<Vec<f32>, ScoreError> {
            if fail {
                Err(ScoreError::Model("weights corrupted".into()))
            } else {
                Ok(vec![0.0, 0.0, 1.0, 0.0, 0.0])
            }
        };
        PredictionContext::new(vocab, Box::new(WordTokenizer), Box::new(scorer), GenerationConfig::default())
    }

    fn body(reply: &Reply) -> serde_json::Value {
        serde_json::from_str(&reply.body).unwrap()
    }

    #[test]
    fn health_is_ok() {
        let reply = handle(&ctx(false), &Method::Get, "/health", b"");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "OK");
    }

    #[test]
    fn predict_returns_text() {
        let reply = handle(&ctx(false), &Method::Post, "/predict", br#"{"seed_text":"the","next_words":2}"#);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "application/json");
        assert_eq!(body(&reply), serde_json::json!({"predicted_text": "the cat cat"}));
    }

    #[test]
    fn next_words_defaults_to_one() {
        let reply = handle(&ctx(false), &Method::Post, "/predict?x=1", br#"{"seed_text":"the"}"#);
        assert_eq!(body(&reply)["predicted_text"], "the cat");
    }

    #[test]
    fn null_next_words_defaults_to_one() {
        let reply = handle(&ctx(false), &Method::Post, "/predict", br#"{"seed_text":"the","next_words":null}"#);
        assert_eq!(reply.status, 200);
        assert_eq!(body(&reply)["predicted_text"], "the cat");
    }

    #[test]
    fn malformed_json_is_a_bad_request() {
        for raw in [&br#"{"seed_text":"the""#[..], &b"not json"[..], &b"\xff"[..], &b"\"the\""[..]] {
            let reply = handle(&ctx(false), &Method::Post, "/predict", raw);
            assert_eq!(reply.status, 400, "{raw:?}");
            assert!(body(&reply)["error"].is_string());
        }
    }

    #[test]
    fn array_body_is_not_a_request() {
        let reply = handle(&ctx(false), &Method::Post, "/predict", br#"["the", 2]"#);
        assert_eq!(reply.status, 500);
        assert_eq!(body(&reply), serde_json::json!({"error": "invalid request: body is not an object"}));
    }

    #[test]
    fn empty_body_is_missing_seed() {
        let reply = handle(&ctx(false), &Method::Post, "/predict", b"");
        assert_eq!(reply.status, 500);
        assert!(body(&reply)["error"].as_str().unwrap().contains("missing field `seed_text`"));
    }

    #[test]
    fn body_within_limit_is_read() {
        let body = read_body(&b"0123456789"[..], 10).unwrap();
        assert_eq!(body, b"0123456789");
    }

    #[test]
    fn body_over_limit_is_too_large() {
        let big = vec![b' '; 1024];
        assert!(matches!(read_body(&big[..], 1023), Err(BodyError::TooLarge(1023))));
    }

    #[test]
    fn non_string_seed_is_a_server_error() {
        let reply = handle(&ctx(false), &Method::Post, "/predict", br#"{"seed_text":5}"#);
        assert_eq!(reply.status, 500);
        assert!(body(&reply)["error"].as_str().unwrap().starts_with("invalid request"));
    }

    #[test]
    fn negative_next_words_is_rejected() {
        let reply = handle(&ctx(false), &Method::Post, "/predict", br#"{"seed_text":"a","next_words":-1}"#);
        assert_eq!(reply.status, 500);
    }

    #[test]
    fn scorer_failure_is_reported() {
        let reply = handle(&ctx(true), &Method::Post, "/predict", br#"{"seed_text":"the"}"#);
        assert_eq!(reply.status, 500);
        assert_eq!(body(&reply), serde_json::json!({"error": "scoring failed: model error: weights corrupted"}));
    }

    #[test]
    fn unknown_routes_are_not_found() {
        assert_eq!(handle(&ctx(false), &Method::Get, "/predict", b"").status, 404);
        assert_eq!(handle(&ctx(false), &Method::Post, "/chat", b"{}").status, 404);
    }
}
