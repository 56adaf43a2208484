//! Application layer
//!
//! Use cases that orchestrate the invoice domain and its repository port.
//! Each use case owns a handle to the port and is shared across requests.

pub mod invoice;
