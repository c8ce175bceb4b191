use std::io::{self, Write};

/// Raw response head for an SSE stream written over `Request::into_writer`.
pub const SSE_RESPONSE_HEAD: &str = "HTTP/1.1 200 OK\r\n\
                                     Content-Type: text/event-stream\r\n\
                                     Cache-Control: no-cache\r\n\
                                     Connection: keep-alive\r\n\
                                     X-Accel-Buffering: no\r\n\
                                     \r\n";

/// Formats a named SSE event with a JSON data payload.
///
/// Output format:
/// ```text
/// event: <name>\n
/// data: <json>\n
/// \n
/// ```
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// Keep-alive comment; ignored by `EventSource` clients.
pub fn format_sse_keepalive() -> &'static str {
    ": ping\n\n"
}

/// Writes all bytes and flushes. An error means the client went away.
pub fn write_sse<W: Write>(writer: &mut W, msg: &str) -> io::Result<()> {
    writer.write_all(msg.as_bytes())?;
    writer.flush()
}
