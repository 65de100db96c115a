//! Mock-context login flow demonstration.
//!
//! This example shows how a SAML engine works against the context
//! abstraction without any web container:
//! 1. Build a mock context carrying the inbound request
//! 2. Let the engine read it through `RequestView`
//! 3. Respond through `ResponseSink`
//! 4. Inspect everything the mock sink recorded
//!
//! Run with: `cargo run --example mock_login_flow`

use std::collections::HashMap;

use saml_http_context::mock::{MockRequestView, MockResponseSink};
use saml_http_context::{Context, Error, RequestView, ResponseSink};

/// A stand-in for the protocol engine: inspects the request and either
/// redirects to the IdP or serves the SP metadata document.
fn handle(request: &dyn RequestView, response: &mut dyn ResponseSink) -> Result<(), Error> {
    match request.parameter("action").as_deref() {
        Some("metadata") => {
            response.set_content_type("application/samlmetadata+xml")?;
            response.write_text("<EntityDescriptor entityID=\"https://sp.example.com\"/>")?;
        }
        _ => {
            let relay_state = request
                .parameter("RelayState")
                .unwrap_or_else(|| "/".to_string());
            response.send_redirect(&format!(
                "https://idp.example.com/sso?RelayState={relay_state}"
            ))?;
        }
    }
    Ok(())
}

fn main() {
    println!("=== Mock Login Flow Example ===\n");

    // Scenario 1: login request gets redirected to the IdP
    println!("--- Scenario 1: Login redirect ---");

    let mut request = MockRequestView::new();
    request.set_method("GET");
    request.set_parameter("RelayState", "/dashboard");
    let mut sink = MockResponseSink::new();

    handle(&request, &mut sink).expect("mock writes cannot fail");

    println!("status:   {}", sink.status());
    println!("location: {:?}", sink.redirect_location());
    assert!(sink.was_redirect_sent());
    assert_eq!(sink.status(), 302);

    // Scenario 2: metadata request gets a written body instead
    println!("\n--- Scenario 2: Metadata document ---");

    let mut parameters = HashMap::new();
    parameters.insert("action".to_string(), "metadata".to_string());
    let request =
        MockRequestView::with_url_and_parameters("https://sp.example.com/metadata", parameters);
    let mut sink = MockResponseSink::new();

    handle(&request, &mut sink).expect("mock writes cannot fail");

    println!("content-type: {:?}", sink.content_type());
    println!("body:         {}", sink.text());
    assert!(!sink.was_redirect_sent());

    // Scenario 3: the same engine code over a full Context, the way a
    // factory would hand it to the engine in production
    println!("\n--- Scenario 3: Through a Context ---");

    let mut request = MockRequestView::new();
    request.set_parameter("RelayState", "/inbox");
    let mut ctx = Context::new(Box::new(request), Box::new(MockResponseSink::new()));

    let (request, response) = ctx.parts();
    handle(request, response).expect("mock writes cannot fail");
    println!("engine handled the request through Context::parts()");
}
