//! HTTP adapter for the endpoint transport port
//!
//! Each endpoint is queried with `POST <target>` and a JSON body
//! `{ "prompt": "..." }`; a successful answer is `{ "response": "..." }`.

mod transport;
mod wire;

pub use transport::{HttpEndpointTransport, HttpSetupError};
