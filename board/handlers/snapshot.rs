use std::io::Cursor;
use tiny_http::Response;
use tracing::error;

use crate::params::ViewParams;
use crate::routes::json_response;
use crate::state::SharedState;

/// `GET /api/snapshot`: one tick as JSON.
///
/// - `200` with `{"status":"ready",...}` or `{"status":"no_data","reason":...}`
/// - `400` for invalid view parameters
/// - `500` when the log cannot be parsed
pub fn handle_get(query: &str, state: &SharedState) -> Response<Cursor<Vec<u8>>> {
    let (status, body) = snapshot_body(query, state);
    json_response(status, body)
}

pub fn snapshot_body(query: &str, state: &SharedState) -> (u16, String) {
    let params = match ViewParams::from_query(query, &state.pipeline) {
        Ok(p) => p,
        Err(msg) => return (400, error_json(&msg)),
    };

    match state.pipeline.tick(&params.request) {
        Ok(outcome) => match serde_json::to_string(&outcome) {
            Ok(json) => (200, json),
            Err(e) => (500, error_json(&e.to_string())),
        },
        Err(e) => {
            error!("snapshot tick failed: {e}");
            (500, error_json(&e.to_string()))
        }
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "status": "error", "message": message }).to_string()
}
