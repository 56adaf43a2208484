//! Invoice issuing and listing service
//!
//! Layers, inside out: `domain` (invoice computation and the repository
//! port), `application` (use cases), `infrastructure` (configuration and the
//! MySQL adapter) and `adapters` (HTTP).

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
