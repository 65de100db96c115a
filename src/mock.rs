//! In-memory context implementation for protocol-engine tests.
//!
//! No host container is involved: the request view is fully settable and the
//! response sink records everything it is asked to do so tests can assert on
//! it. Both faithfully reproduce the normative adapter behaviors
//! (empty-list-on-missing, case-insensitive last-write-wins headers, redirect
//! setting both status and `Location`), so engine tests written against the
//! mock remain valid against real adapters.

use std::any::Any;
use std::collections::HashMap;
use std::io::Write;

use crate::context::{Context, EncodedParameter, RequestView, ResponseSink};
use crate::error::Error;
use crate::factory::ContextFactory;
use crate::header::HeaderMap;

const DEFAULT_URL: &str = "http://localhost:8080/test";

/// A settable, in-memory [`RequestView`].
#[derive(Debug, Clone)]
pub struct MockRequestView {
    url: String,
    method: String,
    query_string: Option<String>,
    parameters: HashMap<String, Vec<String>>,
    headers: HeaderMap,
}

impl MockRequestView {
    /// Creates a GET request to `http://localhost:8080/test` with no
    /// parameters or headers.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            method: "GET".to_string(),
            query_string: None,
            parameters: HashMap::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Creates a request with the given URL and single-valued parameters.
    pub fn with_url_and_parameters(
        url: impl Into<String>,
        parameters: HashMap<String, String>,
    ) -> Self {
        let mut request = Self::new();
        request.url = url.into();
        for (name, value) in parameters {
            request.parameters.insert(name, vec![value]);
        }
        request
    }

    /// Sets the request URL.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Sets the HTTP method.
    pub fn set_method(&mut self, method: impl Into<String>) {
        self.method = method.into();
    }

    /// Sets the query string.
    pub fn set_query_string(&mut self, query_string: impl Into<String>) {
        self.query_string = Some(query_string.into());
    }

    /// Sets a single-valued parameter, replacing previous values.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), vec![value.into()]);
    }

    /// Sets all values of a parameter, replacing previous values.
    pub fn set_parameter_values(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.parameters.insert(name.into(), values);
    }

    /// Sets a request header (case-insensitive, last write wins).
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name, value);
    }
}

impl Default for MockRequestView {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestView for MockRequestView {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn method(&self) -> String {
        self.method.clone()
    }

    fn query_string(&self) -> Option<String> {
        self.query_string.clone()
    }

    fn parameters(&self, name: &str) -> Vec<String> {
        self.parameters.get(name).cloned().unwrap_or_default()
    }

    fn all_parameters(&self) -> HashMap<String, Vec<String>> {
        self.parameters.clone()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).map(str::to_string)
    }

    fn all_headers(&self) -> HashMap<String, String> {
        self.headers.to_map()
    }

    fn encoded_parameter(&self, name: &str) -> Option<EncodedParameter> {
        // The mock mirrors hosts that only retain decoded values.
        self.parameter(name).map(EncodedParameter::decoded)
    }
}

/// A recording, in-memory [`ResponseSink`].
#[derive(Debug, Default)]
pub struct MockResponseSink {
    status: Option<u16>,
    headers: HeaderMap,
    redirect_location: Option<String>,
    text: String,
    bytes: Vec<u8>,
}

impl MockResponseSink {
    /// Creates an empty sink (status defaults to 200 until set).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the effective status code.
    pub fn status(&self) -> u16 {
        self.status.unwrap_or(200)
    }

    /// Looks up a recorded header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns a snapshot of all recorded headers.
    pub fn headers(&self) -> HashMap<String, String> {
        self.headers.to_map()
    }

    /// Returns the recorded content type, if one was set.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }

    /// Returns the location passed to `send_redirect`, if any.
    pub fn redirect_location(&self) -> Option<&str> {
        self.redirect_location.as_deref()
    }

    /// Returns true when `send_redirect` was called.
    pub fn was_redirect_sent(&self) -> bool {
        self.redirect_location.is_some()
    }

    /// Returns all text written through `write_text`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns all bytes written through `write_bytes` or the body stream.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns true when any text content was written.
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Returns true when any binary content was written.
    pub fn has_bytes(&self) -> bool {
        !self.bytes.is_empty()
    }
}

impl ResponseSink for MockResponseSink {
    fn send_redirect(&mut self, location: &str) -> Result<(), Error> {
        self.status = Some(302);
        self.headers.insert("Location", location);
        self.redirect_location = Some(location.to_string());
        Ok(())
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.headers.insert(name, value);
        Ok(())
    }

    fn set_status(&mut self, status: u16) -> Result<(), Error> {
        self.status = Some(status);
        Ok(())
    }

    fn set_content_type(&mut self, content_type: &str) -> Result<(), Error> {
        self.headers.insert("Content-Type", content_type);
        Ok(())
    }

    fn write_text(&mut self, content: &str) -> Result<(), Error> {
        if content.is_empty() {
            return Ok(());
        }
        self.text.push_str(content);
        Ok(())
    }

    fn write_bytes(&mut self, content: &[u8]) -> Result<(), Error> {
        if content.is_empty() {
            return Ok(());
        }
        self.bytes.extend_from_slice(content);
        Ok(())
    }

    fn body(&mut self) -> Result<&mut dyn Write, Error> {
        Ok(&mut self.bytes)
    }
}

/// [`ContextFactory`] building mock contexts from loosely typed inputs.
///
/// The request side is matched in priority order: a `String` is treated as
/// the request URL, a `HashMap<String, String>` as single-valued parameters
/// on the default URL, and a prebuilt [`MockRequestView`] is used as-is.
/// Anything else is an invalid argument. The response side accepts a
/// [`MockResponseSink`]; an absent or foreign response gets a fresh sink, so
/// engine code that writes unconditionally still works under test.
#[derive(Debug, Default)]
pub struct MockContextFactory;

impl MockContextFactory {
    /// Creates the factory.
    pub fn new() -> Self {
        Self
    }

    /// Builds a context with default request and response.
    pub fn create_default() -> Context {
        Context::new(
            Box::new(MockRequestView::new()),
            Box::new(MockResponseSink::new()),
        )
    }

    /// Builds a context for a GET to the given URL.
    pub fn create_with_url(url: impl Into<String>) -> Context {
        Context::new(
            Box::new(MockRequestView::with_url_and_parameters(url, HashMap::new())),
            Box::new(MockResponseSink::new()),
        )
    }

    /// Builds a context carrying the given single-valued parameters.
    pub fn create_with_parameters(parameters: HashMap<String, String>) -> Context {
        Context::new(
            Box::new(MockRequestView::with_url_and_parameters(
                DEFAULT_URL,
                parameters,
            )),
            Box::new(MockResponseSink::new()),
        )
    }
}

impl ContextFactory for MockContextFactory {
    fn create_context(
        &self,
        request: Box<dyn Any>,
        response: Option<Box<dyn Any>>,
    ) -> Result<Context, Error> {
        let request: Box<dyn RequestView> = match request.downcast::<String>() {
            Ok(url) => Box::new(MockRequestView::with_url_and_parameters(
                *url,
                HashMap::new(),
            )),
            Err(request) => match request.downcast::<HashMap<String, String>>() {
                Ok(parameters) => Box::new(MockRequestView::with_url_and_parameters(
                    DEFAULT_URL,
                    *parameters,
                )),
                Err(request) => match request.downcast::<MockRequestView>() {
                    Ok(view) => view,
                    Err(_) => {
                        return Err(Error::invalid_argument(
                            "request must be a String URL, a HashMap<String, String> of \
                             parameters, or a MockRequestView",
                        ))
                    }
                },
            },
        };

        let response: Box<dyn ResponseSink> = match response {
            Some(response) => match response.downcast::<MockResponseSink>() {
                Ok(sink) => sink,
                Err(_) => Box::new(MockResponseSink::new()),
            },
            None => Box::new(MockResponseSink::new()),
        };

        Ok(Context::new(request, response))
    }
}
