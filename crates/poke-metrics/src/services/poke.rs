use std::io::Write;

use bytes::Bytes;
use http::{header, HeaderValue, Request, StatusCode};

use poke_core::{Handler, ResponseWriter};

/// Demo handler: answers with `?status=NNN` (default 200) and a short body.
/// Useful to prove labels end up on the recorded series.
#[derive(Default)]
pub struct PokeHandler;

impl PokeHandler {
    pub fn new() -> Self {
        Self
    }
}

enum Requested {
    Default,
    Status(StatusCode),
    Invalid,
}

fn requested_status(req: &Request<Bytes>) -> Requested {
    let Some(raw) = req
        .uri()
        .query()
        .and_then(|q| q.split('&').find_map(|kv| kv.strip_prefix("status=")))
    else {
        return Requested::Default;
    };
    match raw.parse::<u16>().ok().and_then(|c| StatusCode::from_u16(c).ok()) {
        Some(status) => Requested::Status(status),
        None => Requested::Invalid,
    }
}

impl Handler for PokeHandler {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        w.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );

        match requested_status(req) {
            Requested::Status(status) => {
                w.write_status(status);
                if status != StatusCode::NO_CONTENT {
                    let _ = w.write_all(b"poke");
                }
            }
            Requested::Default => {
                let _ = w.write_all(b"poke");
            }
            Requested::Invalid => {
                w.write_status(StatusCode::BAD_REQUEST);
                let _ = w.write_all(b"invalid status");
            }
        }
    }
}
