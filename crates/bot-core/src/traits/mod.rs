//! Ports - interfaces implemented by infrastructure crates

mod open_api;

pub use open_api::OpenApi;
