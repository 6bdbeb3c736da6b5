#![doc = "The `cookbook` library crate."]
#![doc = ""]
#![doc = "Core business logic for the CookBook recipe-sharing service: domain"]
#![doc = "models and repositories, authentication and authorization, routing"]
#![doc = "configuration and error handling. The binaries (`main.rs` and the"]
#![doc = "`create_admin` seed tool) build the running application on top of it."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
