// API Example Scaffolding - Server Core
//
// Exposes the apidoc-extraction pipeline as a single HTTP endpoint: fetch a
// documentation page, recover its embedded Swagger description and return
// one example request per operation.

pub mod config;
pub mod server;

pub use config::*;
