//! In-memory response writer.
//!
//! Follows the usual server semantics: the first status written is the one
//! sent, and writing body bytes before any status commits `200 OK`.

use std::io;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode};

#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status that will be sent (`200 OK` if nothing committed one).
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Whether a status line has been committed, explicitly or by a body write.
    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_http(self) -> Response<Bytes> {
        let status = self.status();
        let mut res = Response::new(self.body.freeze());
        *res.status_mut() = status;
        *res.headers_mut() = self.headers;
        res
    }
}

impl io::Write for BufferedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl crate::writer::ResponseWriter for BufferedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        match self.status {
            Some(sent) => {
                tracing::warn!(sent = %sent.as_u16(), ignored = %status.as_u16(), "superfluous write_status call");
            }
            None => self.status = Some(status),
        }
    }
}
