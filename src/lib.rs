//! Framework-agnostic HTTP context abstraction for SAML/SSO processors.
//!
//! A SAML engine needs to read an inbound HTTP request and emit a response
//! (redirects, bodies, headers, status codes) without caring which web
//! container hosts it. This crate provides:
//!
//! - **Capability contracts**: [`RequestView`], [`ResponseSink`] and the
//!   [`Context`] pairing them - the only surface the engine sees
//! - **Adapter families**: a [`blocking`] passthrough family for hosts whose
//!   calls return after I/O completes, and a [`reactive`] family that
//!   converts callback-based host writes into bounded blocking calls
//! - **Factories**: runtime dispatch from opaque host objects to the right
//!   adapter via [`ContextFactory`]
//! - **Test double**: an in-memory [`mock`] context for engine tests
//!
//! # Examples
//!
//! ```
//! use saml_http_context::mock::{MockRequestView, MockResponseSink};
//! use saml_http_context::Context;
//!
//! let mut request = MockRequestView::new();
//! request.set_parameter("SAMLRequest", "fZFNT8Mw");
//!
//! let mut ctx = Context::new(Box::new(request), Box::new(MockResponseSink::new()));
//!
//! // The engine reads the request...
//! assert_eq!(ctx.request().parameter("SAMLRequest").as_deref(), Some("fZFNT8Mw"));
//!
//! // ...and answers through the sink, never touching the host directly.
//! ctx.response().send_redirect("https://idp.example.com/sso").unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod error;
mod factory;
mod header;
mod query;

pub mod blocking;
pub mod mock;
pub mod reactive;

pub use context::{Context, EncodedParameter, RequestView, ResponseSink};
pub use error::{Error, ErrorKind};
pub use factory::ContextFactory;
pub use header::HeaderMap;
