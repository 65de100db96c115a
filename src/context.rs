//! The capability contracts every host adapter satisfies.
//!
//! The protocol engine is written against [`RequestView`] and
//! [`ResponseSink`] only; once a [`Context`] exists the engine is fully
//! decoupled from the hosting container.

use std::collections::HashMap;
use std::io::Write;

use crate::error::Error;

/// A request parameter value together with a record of whether it still
/// carries its original wire (percent-encoded) form.
///
/// SAML redirect bindings sign the exact encoded query string, so engines
/// validating signatures must know when an adapter could only supply the
/// already-decoded value. The decoded fallback is a documented degradation,
/// not a bug - this type makes it observable instead of silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedParameter {
    value: String,
    originally_encoded: bool,
}

impl EncodedParameter {
    /// Wraps a value recovered in its original wire encoding.
    pub fn wire(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            originally_encoded: true,
        }
    }

    /// Wraps a decoded value the host could not supply in wire form.
    pub fn decoded(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            originally_encoded: false,
        }
    }

    /// Returns the parameter value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes self, returning the parameter value.
    pub fn into_value(self) -> String {
        self.value
    }

    /// Returns true when the value is the original percent-encoded wire form.
    pub fn originally_encoded(&self) -> bool {
        self.originally_encoded
    }
}

/// Read-only view of an inbound HTTP request.
///
/// Lookups never mutate adapter state: repeated calls with the same name are
/// idempotent and return equal results for the lifetime of one request.
/// Adapters do not cache data the host can supply lazily, since some hosts
/// mutate backing buffers between calls.
pub trait RequestView {
    /// Returns the URL the client used to make the request - protocol,
    /// server name, port and path, but no query string.
    fn url(&self) -> String;

    /// Returns the HTTP method of the request ("GET", "POST", ...).
    fn method(&self) -> String;

    /// Returns the query string after the path, if any.
    fn query_string(&self) -> Option<String>;

    /// Returns all values of the parameter, in insertion order.
    /// Empty (never absent) when the parameter is unknown.
    fn parameters(&self, name: &str) -> Vec<String>;

    /// Returns the first value of the parameter, or `None` when unknown.
    fn parameter(&self, name: &str) -> Option<String> {
        self.parameters(name).into_iter().next()
    }

    /// Returns a snapshot of all request parameters.
    fn all_parameters(&self) -> HashMap<String, Vec<String>>;

    /// Looks up a request header by case-insensitive name.
    fn header(&self, name: &str) -> Option<String>;

    /// Returns a snapshot of all request headers, keyed by the names the
    /// host reported.
    fn all_headers(&self) -> HashMap<String, String>;

    /// Returns the parameter preserving its original percent-encoding when
    /// the host can supply it, falling back to the decoded value otherwise.
    ///
    /// The fallback is flagged on the returned [`EncodedParameter`].
    fn encoded_parameter(&self, name: &str) -> Option<EncodedParameter>;

    /// Like [`encoded_parameter`](Self::encoded_parameter), but returns
    /// `default` (as a decoded value) when the parameter is unknown.
    fn encoded_parameter_or(&self, name: &str, default: &str) -> EncodedParameter {
        self.encoded_parameter(name)
            .unwrap_or_else(|| EncodedParameter::decoded(default))
    }
}

/// Write-only handle for emitting an HTTP response.
///
/// Fields are single-use: the last write per header name wins, and issuing
/// another body write after a redirect or a previous body write is
/// last-write-wins on the host side - the sink does not buffer or reorder.
pub trait ResponseSink {
    /// Sends a temporary redirect to `location`.
    ///
    /// Synchronous from the caller's point of view: control returns only
    /// after the underlying transport has accepted or rejected the write.
    /// Fails with an `Io` error on transport failure and `Timeout` when a
    /// bounded wait on an asynchronous host expires.
    fn send_redirect(&mut self, location: &str) -> Result<(), Error>;

    /// Sets a response header; the last write per name wins.
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error>;

    /// Sets the response status code (host default, normally 200, until set).
    fn set_status(&mut self, status: u16) -> Result<(), Error>;

    /// Sets the response content type.
    fn set_content_type(&mut self, content_type: &str) -> Result<(), Error>;

    /// Writes textual content to the response body.
    ///
    /// A no-op returning immediately when `content` is empty.
    fn write_text(&mut self, content: &str) -> Result<(), Error>;

    /// Writes binary content to the response body.
    ///
    /// A no-op returning immediately when `content` is empty.
    fn write_bytes(&mut self, content: &[u8]) -> Result<(), Error>;

    /// Returns the host's body stream for direct writing.
    fn body(&mut self) -> Result<&mut dyn Write, Error>;
}

/// An immutable pairing of exactly one [`RequestView`] and one
/// [`ResponseSink`].
///
/// Constructed once per inbound request (by a factory or directly), passed
/// by reference through the engine's call chain, and discarded when the
/// engine returns. A context is never reused across requests.
pub struct Context {
    request: Box<dyn RequestView>,
    response: Box<dyn ResponseSink>,
}

impl Context {
    /// Pairs a request view with a response sink.
    pub fn new(request: Box<dyn RequestView>, response: Box<dyn ResponseSink>) -> Self {
        Self { request, response }
    }

    /// Returns the request view.
    pub fn request(&self) -> &dyn RequestView {
        self.request.as_ref()
    }

    /// Returns the response sink.
    pub fn response(&mut self) -> &mut dyn ResponseSink {
        self.response.as_mut()
    }

    /// Splits the context into its two sides, so the engine can keep
    /// reading the request while writing the response.
    pub fn parts(&mut self) -> (&dyn RequestView, &mut dyn ResponseSink) {
        (self.request.as_ref(), self.response.as_mut())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}
