//! Runtime dispatch from opaque host objects to a concrete adapter family.
//!
//! Factories are the only place container-specific type checks happen. Each
//! concrete factory supports exactly one host family and downcasts the two
//! opaque objects to that family's concrete types, failing fast with an
//! invalid-argument error when they do not match. Composing several factories
//! into an aggregate is left to callers.

use std::any::Any;

use crate::context::Context;
use crate::error::Error;

/// Creates framework-agnostic contexts from framework-specific host objects.
///
/// The request and response arguments are deliberately untyped: the caller
/// sits at the boundary where only the hosting container knows the concrete
/// types. The response side may be legitimately absent for hosts that
/// construct request-only contexts.
pub trait ContextFactory {
    /// Creates a context from separate host request and response objects.
    ///
    /// Fails with an invalid-argument error naming the expected type when
    /// either object is not of the family's type, or when a required side
    /// is absent.
    fn create_context(
        &self,
        request: Box<dyn Any>,
        response: Option<Box<dyn Any>>,
    ) -> Result<Context, Error>;

    /// Creates a context from a single host object carrying both request and
    /// response roles (combined-object hosts).
    ///
    /// The default form delegates to [`create_context`](Self::create_context)
    /// with an absent response.
    fn create_from_combined(&self, request_response: Box<dyn Any>) -> Result<Context, Error> {
        self.create_context(request_response, None)
    }
}

/// Downcasts one opaque host object, mapping failure to the factory's
/// invalid-argument error. `dyn Any` cannot reveal the runtime type name of
/// a rejected object, so the error names the expected type instead.
pub(crate) fn downcast_host<T: 'static>(object: Box<dyn Any>, role: &str) -> Result<Box<T>, Error> {
    object.downcast::<T>().map_err(|_| {
        Error::invalid_argument(format!(
            "{role} must be {}, got an unsupported type",
            std::any::type_name::<T>()
        ))
    })
}
