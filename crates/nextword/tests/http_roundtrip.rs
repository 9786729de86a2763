use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;

use nextword::{http, PredictionContext, ScoreError, ServiceConfig};
use tiny_http::Server;

fn context() -> PredictionContext {
    let corpus = vec!["the cat sat".to_string(), "the cat ran".to_string()];
    PredictionContext::load_with(&ServiceConfig::default(), &corpus, |dims| {
        Ok(move |_: &[usize]| -> Result<Vec<f32>, ScoreError> {
            let mut scores = vec![0.0; dims.outputs];
            scores[2] = 1.0;
            Ok(scores)
        })
    })
    .unwrap()
}

fn roundtrip(raw: &str) -> String {
    roundtrip_limited(raw, ServiceConfig::default().max_body_bytes)
}

fn roundtrip_limited(raw: &str, max_body_bytes: usize) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let ctx = Arc::new(context());

    let worker = {
        let ctx = Arc::clone(&ctx);
        thread::spawn(move || {
            let request = server.recv().unwrap();
            http::serve(&ctx, request, max_body_bytes);
        })
    };

    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(raw.as_bytes()).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    worker.join().unwrap();
    response
}

#[test]
fn predict_over_http() {
    let body = r#"{"seed_text":"the","next_words":2}"#;
    let raw = format!(
        "POST /predict HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let response = roundtrip(&raw);
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains(r#"{"predicted_text":"the cat cat"}"#), "{response}");
}

#[test]
fn bad_body_over_http_is_500() {
    let body = r#"{"next_words":2}"#;
    let raw = format!(
        "POST /predict HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let response = roundtrip(&raw);
    assert!(response.starts_with("HTTP/1.1 500"), "{response}");
    assert!(response.contains("missing field `seed_text`"), "{response}");
}

fn post_predict(body: &str) -> String {
    format!(
        "POST /predict HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

#[test]
fn unparseable_json_over_http_is_400() {
    let response = roundtrip(&post_predict(r#"{"seed_text":"the""#));
    assert!(response.starts_with("HTTP/1.1 400"), "{response}");
    assert!(response.contains("malformed JSON body"), "{response}");
}

#[test]
fn oversized_body_over_http_is_413() {
    let body = format!(r#"{{"seed_text":"{}"}}"#, "the ".repeat(32));
    let response = roundtrip_limited(&post_predict(&body), 64);
    assert!(response.starts_with("HTTP/1.1 413"), "{response}");
    assert!(response.contains("exceeds 64 bytes"), "{response}");
}

#[test]
fn body_at_limit_over_http_is_served() {
    let body = r#"{"seed_text":"the"}"#;
    let response = roundtrip_limited(&post_predict(body), body.len());
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
}

#[test]
fn health_over_http() {
    let response = roundtrip("GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("OK"), "{response}");
}
