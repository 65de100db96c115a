//! Property tests for the context contract.
//!
//! These validate the cross-adapter invariants over generated inputs: the
//! first-value law for parameters, case-insensitive headers, and wire-form
//! recovery of encoded query parameters.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use proptest::prelude::*;
use saml_http_context::blocking::{BlockingHttpRequest, BlockingRequestView};
use saml_http_context::mock::{MockRequestView, MockResponseSink};
use saml_http_context::{RequestView, ResponseSink};

// Strategy: parameter names the engine realistically sees
fn arb_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9_]{0,15}").unwrap()
}

// Strategy: parameter values including characters that need escaping
fn arb_value() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{0,24}").unwrap()
}

proptest! {
    /// Property: `parameter` always equals the first element of
    /// `parameters`, and unknown names yield empty, never absent.
    #[test]
    fn first_value_law(
        name in arb_name(),
        values in prop::collection::vec(arb_value(), 0..4),
        probe in arb_name(),
    ) {
        let mut request = MockRequestView::new();
        request.set_parameter_values(name.clone(), values.clone());

        let got = request.parameter(&name);
        match values.first() {
            Some(first) => prop_assert_eq!(got.as_deref(), Some(first.as_str())),
            None => prop_assert_eq!(got, None),
        }
        prop_assert_eq!(request.parameters(&name), values);

        if probe != name {
            prop_assert_eq!(request.parameters(&probe), Vec::<String>::new());
            prop_assert_eq!(request.parameter(&probe), None);
        }
    }

    /// Property: header lookup ignores ASCII case, on request and response,
    /// and the last write wins regardless of the casing it used.
    #[test]
    fn header_case_insensitivity(
        name in prop::string::string_regex("[A-Za-z][A-Za-z0-9-]{0,15}").unwrap(),
        first in arb_value(),
        second in arb_value(),
    ) {
        let upper = name.to_ascii_uppercase();
        let lower = name.to_ascii_lowercase();

        let mut request = MockRequestView::new();
        request.set_header(upper.clone(), first.clone());
        let got = request.header(&lower);
        prop_assert_eq!(got.as_deref(), Some(first.as_str()));

        let mut sink = MockResponseSink::new();
        sink.set_header(&upper, &first).unwrap();
        sink.set_header(&lower, &second).unwrap();
        prop_assert_eq!(sink.header(&name), Some(second.as_str()));
    }

    /// Property: a percent-encoded query parameter is recoverable in its
    /// exact wire form through the blocking family's encoded accessor, and
    /// the recovered form decodes back to the host-decoded value.
    #[test]
    fn wire_form_roundtrip(name in arb_name(), value in arb_value()) {
        let encoded_value = utf8_percent_encode(&value, NON_ALPHANUMERIC).to_string();
        let query = format!("{name}={encoded_value}&other=x");

        let view = WireStubView { query, name: name.clone(), decoded: value.clone() };
        let recovered = view.encoded_parameter(&name).unwrap();

        prop_assert!(recovered.originally_encoded());
        prop_assert_eq!(recovered.value(), encoded_value.as_str());

        let decoded_back = percent_encoding::percent_decode_str(recovered.value())
            .decode_utf8()
            .unwrap();
        prop_assert_eq!(decoded_back.as_ref(), value.as_str());
    }

    /// Property: all-parameter snapshots agree with per-name lookups.
    #[test]
    fn snapshot_agrees_with_lookups(
        entries in prop::collection::hash_map(arb_name(), prop::collection::vec(arb_value(), 1..3), 0..5),
    ) {
        let mut request = MockRequestView::new();
        for (name, values) in &entries {
            request.set_parameter_values(name.clone(), values.clone());
        }

        let snapshot = request.all_parameters();
        prop_assert_eq!(snapshot.len(), entries.len());
        for (name, values) in &entries {
            prop_assert_eq!(snapshot.get(name), Some(values));
            prop_assert_eq!(&request.parameters(name), values);
        }
    }
}

/// Minimal blocking host view for the wire-form property: exposes a raw
/// query string plus the decoded parameter, like a real container would.
struct WireStubView {
    query: String,
    name: String,
    decoded: String,
}

impl BlockingHttpRequest for WireStubView {
    fn url(&self) -> String {
        "https://sp.example.com/login".to_string()
    }
    fn method(&self) -> String {
        "GET".to_string()
    }
    fn query_string(&self) -> Option<String> {
        Some(self.query.clone())
    }
    fn parameter_values(&self, name: &str) -> Option<Vec<String>> {
        (name == self.name).then(|| vec![self.decoded.clone()])
    }
    fn parameter_map(&self) -> HashMap<String, Vec<String>> {
        let mut map = HashMap::new();
        map.insert(self.name.clone(), vec![self.decoded.clone()]);
        map
    }
    fn header(&self, _name: &str) -> Option<String> {
        None
    }
    fn header_names(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(std::iter::empty())
    }
}

impl WireStubView {
    fn encoded_parameter(self, name: &str) -> Option<saml_http_context::EncodedParameter> {
        BlockingRequestView::new(self).encoded_parameter(name)
    }
}
