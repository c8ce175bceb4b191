use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::debug;

use crate::handlers;
use crate::state::SharedState;
use crate::util::form::split_url;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("static header is valid ASCII")
}

fn text_response(status: u16, content_type: &str, body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![
            header("Content-Type", content_type),
            header("Cache-Control", "no-cache"),
        ],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    text_response(200, "text/html; charset=utf-8", body)
}

pub fn json_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    text_response(status, "application/json", body)
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    text_response(404, "text/plain", "404 Not Found".to_owned())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// The SSE handler takes ownership of the request to stream over the raw
/// connection; every other handler returns a response sent here.
pub fn dispatch(request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();
    let (path, query) = split_url(&url);
    debug!(%method, path, "request");

    if method == Method::Get && path == "/events" {
        handlers::events::handle(request, query, state);
        return;
    }

    let response = match (method, path) {
        (Method::Get, "/")             => handlers::dashboard::handle_get(&state),
        (Method::Get, "/api/snapshot") => handlers::snapshot::handle_get(query, &state),
        _ => not_found(),
    };

    let _ = request.respond(response);
}
