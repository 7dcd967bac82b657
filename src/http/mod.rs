mod builder;
mod client;
mod executor;


pub use builder::{FORM_URLENCODED, MULTIPART_FORM_DATA, build_request};
pub use client::build_client;
pub use executor::{RawResponse, execute};
