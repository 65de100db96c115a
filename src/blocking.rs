//! The blocking adapter family.
//!
//! Hosts in this family (servlet-style containers) expose request/response
//! objects whose methods return only after I/O completes, so every context
//! operation is a one-to-one passthrough: no buffering, no retry, no caching.
//!
//! The two host traits below are the family's entire downstream contract -
//! an integration implements them for its container's request and response
//! types and nothing else is ever invoked.

use std::any::Any;
use std::collections::HashMap;
use std::io::{self, Write};
use std::marker::PhantomData;

use crate::context::{Context, EncodedParameter, RequestView, ResponseSink};
use crate::error::Error;
use crate::factory::{downcast_host, ContextFactory};
use crate::query;

/// The request calls the blocking family makes on its host.
///
/// Header lookup must be case-insensitive, as every mainstream container's
/// request object already is.
pub trait BlockingHttpRequest {
    /// Request URL without the query string.
    fn url(&self) -> String;
    /// HTTP method.
    fn method(&self) -> String;
    /// Unparsed query string, if any.
    fn query_string(&self) -> Option<String>;
    /// All decoded values for a parameter, `None` when unknown.
    fn parameter_values(&self, name: &str) -> Option<Vec<String>>;
    /// Snapshot of the full decoded parameter map.
    fn parameter_map(&self) -> HashMap<String, Vec<String>>;
    /// Case-insensitive header lookup.
    fn header(&self, name: &str) -> Option<String>;
    /// Enumerates header names. Consumed exactly once per
    /// [`RequestView::all_headers`] call; names are never cached.
    fn header_names(&self) -> Box<dyn Iterator<Item = String> + '_>;
}

/// The response calls the blocking family makes on its host.
///
/// `send_redirect` must block until the transport accepted or rejected the
/// write, and is expected to set the redirect status and `Location` header
/// on the host side.
pub trait BlockingHttpResponse {
    /// Sends a temporary redirect, blocking until I/O completes.
    fn send_redirect(&mut self, location: &str) -> io::Result<()>;
    /// Sets a response header (last write per name wins).
    fn set_header(&mut self, name: &str, value: &str);
    /// Sets the response status code.
    fn set_status(&mut self, status: u16);
    /// Sets the response content type.
    fn set_content_type(&mut self, content_type: &str);
    /// Returns the response body stream.
    fn body(&mut self) -> io::Result<&mut dyn Write>;
}

/// [`RequestView`] over a blocking host request.
#[derive(Debug)]
pub struct BlockingRequestView<R> {
    host: R,
}

impl<R: BlockingHttpRequest> BlockingRequestView<R> {
    /// Wraps a blocking host request.
    pub fn new(host: R) -> Self {
        Self { host }
    }
}

impl<R: BlockingHttpRequest> RequestView for BlockingRequestView<R> {
    fn url(&self) -> String {
        self.host.url()
    }

    fn method(&self) -> String {
        self.host.method()
    }

    fn query_string(&self) -> Option<String> {
        self.host.query_string()
    }

    fn parameters(&self, name: &str) -> Vec<String> {
        self.host.parameter_values(name).unwrap_or_default()
    }

    fn parameter(&self, name: &str) -> Option<String> {
        self.host
            .parameter_values(name)
            .and_then(|values| values.into_iter().next())
    }

    fn all_parameters(&self) -> HashMap<String, Vec<String>> {
        self.host.parameter_map()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.host.header(name)
    }

    fn all_headers(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();
        for name in self.host.header_names() {
            if let Some(value) = self.host.header(&name) {
                result.insert(name, value);
            }
        }
        result
    }

    fn encoded_parameter(&self, name: &str) -> Option<EncodedParameter> {
        if let Some(query) = self.host.query_string() {
            if let Some(raw) = query::raw_value(&query, name) {
                return Some(EncodedParameter::wire(raw));
            }
        }
        // Not on the query string (POST body parameter, or none at all):
        // the host has already decoded it, so the wire form is gone.
        let value = self.parameter(name)?;
        tracing::debug!(parameter = name, "original encoding unavailable, returning decoded value");
        Some(EncodedParameter::decoded(value))
    }
}

/// [`ResponseSink`] over a blocking host response.
///
/// The host may be absent for request-only contexts (e.g. inspecting an
/// inbound message without answering it); every write operation then fails
/// fast with a precondition error instead of dereferencing nothing.
#[derive(Debug)]
pub struct BlockingResponseSink<R> {
    host: Option<R>,
}

impl<R: BlockingHttpResponse> BlockingResponseSink<R> {
    /// Wraps a blocking host response.
    pub fn new(host: R) -> Self {
        Self { host: Some(host) }
    }

    /// Creates a sink with no response side; every write fails with a
    /// precondition error.
    pub fn absent() -> Self {
        Self { host: None }
    }

    fn host_mut(&mut self, operation: &str) -> Result<&mut R, Error> {
        self.host.as_mut().ok_or_else(|| {
            Error::precondition(format!("host response is absent - cannot {operation}"))
        })
    }
}

impl<R: BlockingHttpResponse> ResponseSink for BlockingResponseSink<R> {
    fn send_redirect(&mut self, location: &str) -> Result<(), Error> {
        let host = self.host_mut("send redirect")?;
        tracing::debug!(location, "sending redirect through blocking host");
        host.send_redirect(location)
            .map_err(|e| Error::io_caused_by("failed to send redirect", e))
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let host = self.host_mut("set header")?;
        host.set_header(name, value);
        Ok(())
    }

    fn set_status(&mut self, status: u16) -> Result<(), Error> {
        let host = self.host_mut("set status")?;
        host.set_status(status);
        Ok(())
    }

    fn set_content_type(&mut self, content_type: &str) -> Result<(), Error> {
        let host = self.host_mut("set content type")?;
        host.set_content_type(content_type);
        Ok(())
    }

    fn write_text(&mut self, content: &str) -> Result<(), Error> {
        if content.is_empty() {
            return Ok(());
        }
        let body = self.body()?;
        body.write_all(content.as_bytes())?;
        body.flush()?;
        Ok(())
    }

    fn write_bytes(&mut self, content: &[u8]) -> Result<(), Error> {
        if content.is_empty() {
            return Ok(());
        }
        let body = self.body()?;
        body.write_all(content)?;
        body.flush()?;
        Ok(())
    }

    fn body(&mut self) -> Result<&mut dyn Write, Error> {
        let host = self.host_mut("write body")?;
        host.body()
            .map_err(|e| Error::io_caused_by("failed to open host body stream", e))
    }
}

/// [`ContextFactory`] for one concrete blocking host type pair.
///
/// The response object may be absent; the context then carries an absent
/// sink whose writes fail with precondition errors.
pub struct BlockingContextFactory<Req, Resp> {
    _marker: PhantomData<fn() -> (Req, Resp)>,
}

impl<Req, Resp> BlockingContextFactory<Req, Resp> {
    /// Creates the factory.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<Req, Resp> Default for BlockingContextFactory<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> ContextFactory for BlockingContextFactory<Req, Resp>
where
    Req: BlockingHttpRequest + 'static,
    Resp: BlockingHttpResponse + 'static,
{
    fn create_context(
        &self,
        request: Box<dyn Any>,
        response: Option<Box<dyn Any>>,
    ) -> Result<Context, Error> {
        let request = downcast_host::<Req>(request, "request")?;
        let sink = match response {
            Some(response) => BlockingResponseSink::new(*downcast_host::<Resp>(response, "response")?),
            None => BlockingResponseSink::absent(),
        };
        Ok(Context::new(
            Box::new(BlockingRequestView::new(*request)),
            Box::new(sink),
        ))
    }
}
