//! Cart Fixtures

use serde::Deserialize;

use crate::checkout::{CheckoutRequest, RawLine};

/// A storefront cart as written in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Payment method, if not the default
    #[serde(default)]
    pub payment_method: Option<String>,

    /// Requested lines
    pub lines: Vec<RawLine>,
}

impl From<CartFixture> for CheckoutRequest {
    fn from(fixture: CartFixture) -> Self {
        let request = CheckoutRequest::from_lines(fixture.lines);

        match fixture.payment_method {
            Some(payment_method) => request.with_payment_method(payment_method),
            None => request,
        }
    }
}
