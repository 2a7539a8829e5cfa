//! Response writer contract and the status-capturing decorator.
//!
//! `ResponseWriter` is the write side of a response: headers, a single status
//! line, and body bytes through `std::io::Write`. `StatusRecorder` wraps any
//! writer and remembers the status a handler sends, without changing what
//! reaches the wrapped writer.

use std::io;

use http::{HeaderMap, StatusCode};

/// Write side of an HTTP response.
pub trait ResponseWriter: io::Write {
    /// Headers that will be sent with the response.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Send the status line.
    fn write_status(&mut self, status: StatusCode);
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        (**self).write_status(status)
    }
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for Box<W> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        (**self).write_status(status)
    }
}

/// Decorator that captures the status code written through it.
///
/// The captured status starts at `200 OK`, the status a response carries when
/// the handler never sets one. Every `write_status` call is recorded and then
/// forwarded unchanged. Body writes and header access go straight to the
/// inner writer.
#[derive(Debug)]
pub struct StatusRecorder<W> {
    inner: W,
    status: StatusCode,
}

impl<W: ResponseWriter> StatusRecorder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            status: StatusCode::OK,
        }
    }

    /// Status captured so far.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: ResponseWriter> io::Write for StatusRecorder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn write_vectored(&mut self, bufs: &[io::IoSlice<'_>]) -> io::Result<usize> {
        self.inner.write_vectored(bufs)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: ResponseWriter> ResponseWriter for StatusRecorder<W> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = status;
        self.inner.write_status(status);
    }
}
