//! Sample handlers served through `apigen`-generated dispatch.
//!
//! `build.rs` runs the generator over [`api`] and the module `include!`s the
//! result, giving [`api::MyApi`] and [`api::OtherApi`] their `serve_http`.

pub mod api;
