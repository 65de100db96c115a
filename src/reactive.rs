//! The reactive adapter family.
//!
//! Hosts in this family model response writes asynchronously: the call
//! enqueues I/O and reports completion later through a callback, possibly
//! from another execution context. The protocol engine requires synchronous
//! semantics, so this adapter converts each callback-based write into a
//! blocking call with a bounded wait on a [`CompletionSignal`].
//!
//! Reading is simpler but has its own wrinkle: parameter parsing on these
//! hosts is itself a fallible, possibly lazy operation. When it fails, the
//! lookups degrade to absent/empty results instead of propagating - the
//! redirect/login path stays available in the face of malformed query data,
//! while write failures always surface.

use std::any::Any;
use std::collections::HashMap;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender};
use std::time::Duration;

use crate::context::{Context, EncodedParameter, RequestView, ResponseSink};
use crate::error::Error;
use crate::factory::{downcast_host, ContextFactory};

/// Default upper bound on the redirect completion wait.
pub const DEFAULT_REDIRECT_TIMEOUT: Duration = Duration::from_secs(30);

/// The failure a reactive host reports through its completion callback.
pub type HostFailure = Box<dyn std::error::Error + Send + Sync>;

/// Success/failure callback handed to a reactive host write operation.
///
/// The host must eventually consume the signal by calling
/// [`succeeded`](Self::succeeded) or [`failed`](Self::failed); dropping it
/// unconsumed is reported to the waiting adapter as an I/O failure. The
/// signal may be fired from any thread.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: SyncSender<Result<(), HostFailure>>,
}

impl CompletionSignal {
    /// Creates a signal and the receiver the adapter blocks on.
    pub(crate) fn channel() -> (Self, mpsc::Receiver<Result<(), HostFailure>>) {
        // One buffered slot so the host never blocks on delivery, even when
        // the adapter already gave up waiting.
        let (tx, rx) = mpsc::sync_channel(1);
        (Self { tx }, rx)
    }

    /// Reports that the host operation completed.
    pub fn succeeded(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// Reports that the host operation failed, preserving the cause.
    pub fn failed(self, cause: HostFailure) {
        let _ = self.tx.send(Err(cause));
    }
}

/// The request calls the reactive family makes on its host.
pub trait ReactiveHttpRequest {
    /// Request URL without the query string.
    fn url(&self) -> String;
    /// HTTP method.
    fn method(&self) -> String;
    /// Unparsed query string, if any.
    fn query_string(&self) -> Option<String>;
    /// Parses and returns the full decoded parameter map. May be lazy on
    /// the host side and may fail on malformed input.
    fn parse_parameters(&self) -> Result<HashMap<String, Vec<String>>, HostFailure>;
    /// Case-insensitive header lookup.
    fn header(&self, name: &str) -> Option<String>;
    /// Snapshot of all headers as `(name, value)` pairs.
    fn headers(&self) -> Vec<(String, String)>;
}

/// The response calls the reactive family makes on its host.
pub trait ReactiveHttpResponse {
    /// Sets the response status code.
    fn set_status(&mut self, status: u16);
    /// Sets a response header (last write per name wins).
    fn set_header(&mut self, name: &str, value: &str);
    /// Begins an asynchronous redirect. The host signals completion through
    /// `done`, possibly from another thread; it must also set the redirect
    /// status and `Location` header.
    fn start_redirect(&mut self, location: &str, done: CompletionSignal);
    /// Returns the host's buffered body stream. Acquisition is synchronous;
    /// the buffering layer absorbs the asynchronous flush.
    fn buffered_body(&mut self) -> io::Result<&mut dyn Write>;
}

/// [`RequestView`] over a reactive host request.
///
/// Parameter lookups call the host per invocation (parsing may be lazy and
/// host buffers may move between calls) and degrade to absent/empty when the
/// host reports a parse failure.
#[derive(Debug)]
pub struct ReactiveRequestView<R> {
    host: R,
}

impl<R: ReactiveHttpRequest> ReactiveRequestView<R> {
    /// Wraps a reactive host request.
    pub fn new(host: R) -> Self {
        Self { host }
    }

    fn parameters_or_empty(&self) -> HashMap<String, Vec<String>> {
        match self.host.parse_parameters() {
            Ok(parameters) => parameters,
            Err(e) => {
                tracing::warn!(error = %e, "parameter parsing failed, treating request as parameterless");
                HashMap::new()
            }
        }
    }
}

impl<R: ReactiveHttpRequest> RequestView for ReactiveRequestView<R> {
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
        self.parameters_or_empty().remove(name).unwrap_or_default()
    }

    fn all_parameters(&self) -> HashMap<String, Vec<String>> {
        self.parameters_or_empty()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.host.header(name)
    }

    fn all_headers(&self) -> HashMap<String, String> {
        self.host.headers().into_iter().collect()
    }

    fn encoded_parameter(&self, name: &str) -> Option<EncodedParameter> {
        // This host family normalizes parameters during parsing; the wire
        // form is unrecoverable by the time the adapter sees them.
        let value = self.parameter(name)?;
        tracing::debug!(parameter = name, "reactive host cannot supply wire encoding, returning decoded value");
        Some(EncodedParameter::decoded(value))
    }
}

/// [`ResponseSink`] over a reactive host response.
///
/// Redirects suspend the calling thread until the host's completion signal
/// fires or `redirect_timeout` expires. On expiry the in-flight host
/// operation is *not* cancelled (reactive hosts do not generally support
/// cancellation); the adapter only stops waiting.
#[derive(Debug)]
pub struct ReactiveResponseSink<R> {
    host: R,
    redirect_timeout: Duration,
}

impl<R: ReactiveHttpResponse> ReactiveResponseSink<R> {
    /// Wraps a reactive host response with the default redirect timeout.
    pub fn new(host: R) -> Self {
        Self {
            host,
            redirect_timeout: DEFAULT_REDIRECT_TIMEOUT,
        }
    }

    /// Overrides the bounded wait applied to redirect completion.
    pub fn with_redirect_timeout(mut self, timeout: Duration) -> Self {
        self.redirect_timeout = timeout;
        self
    }
}

impl<R: ReactiveHttpResponse> ResponseSink for ReactiveResponseSink<R> {
    fn send_redirect(&mut self, location: &str) -> Result<(), Error> {
        let (signal, done) = CompletionSignal::channel();
        tracing::debug!(location, "starting reactive redirect");
        self.host.start_redirect(location, signal);

        match done.recv_timeout(self.redirect_timeout) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(cause)) => Err(Error::io_caused_by(
                "host reported redirect failure",
                SignalledFailure(cause),
            )),
            Err(RecvTimeoutError::Timeout) => Err(Error::timeout(format!(
                "redirect not acknowledged within {:?}",
                self.redirect_timeout
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(Error::io(
                "host dropped the completion signal without firing it",
            )),
        }
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.host.set_header(name, value);
        Ok(())
    }

    fn set_status(&mut self, status: u16) -> Result<(), Error> {
        self.host.set_status(status);
        Ok(())
    }

    fn set_content_type(&mut self, content_type: &str) -> Result<(), Error> {
        self.host.set_header("Content-Type", content_type);
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
        self.host
            .buffered_body()
            .map_err(|e| Error::io_caused_by("failed to open buffered host body stream", e))
    }
}

/// Wrapper giving a host-reported failure an `Error` source slot.
#[derive(Debug)]
struct SignalledFailure(HostFailure);

impl std::fmt::Display for SignalledFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for SignalledFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// [`ContextFactory`] for one concrete reactive host type pair.
///
/// Unlike the blocking family, this family has no request-only form: the
/// response object is required, and its absence is an invalid-argument
/// error.
pub struct ReactiveContextFactory<Req, Resp> {
    redirect_timeout: Duration,
    _marker: PhantomData<fn() -> (Req, Resp)>,
}

impl<Req, Resp> ReactiveContextFactory<Req, Resp> {
    /// Creates the factory with the default redirect timeout.
    pub fn new() -> Self {
        Self {
            redirect_timeout: DEFAULT_REDIRECT_TIMEOUT,
            _marker: PhantomData,
        }
    }

    /// Overrides the redirect timeout applied to constructed sinks.
    pub fn with_redirect_timeout(mut self, timeout: Duration) -> Self {
        self.redirect_timeout = timeout;
        self
    }
}

impl<Req, Resp> Default for ReactiveContextFactory<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> ContextFactory for ReactiveContextFactory<Req, Resp>
where
    Req: ReactiveHttpRequest + 'static,
    Resp: ReactiveHttpResponse + 'static,
{
    fn create_context(
        &self,
        request: Box<dyn Any>,
        response: Option<Box<dyn Any>>,
    ) -> Result<Context, Error> {
        let request = downcast_host::<Req>(request, "request")?;
        let response = response.ok_or_else(|| {
            Error::invalid_argument("reactive hosts require a response object, got none")
        })?;
        let response = downcast_host::<Resp>(response, "response")?;
        Ok(Context::new(
            Box::new(ReactiveRequestView::new(*request)),
            Box::new(
                ReactiveResponseSink::new(*response).with_redirect_timeout(self.redirect_timeout),
            ),
        ))
    }
}
