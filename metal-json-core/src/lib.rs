#![doc = "metal-json-core: core logic library for metal-json."]

//! Turns pasted precious-metal price tables into JSON documents and publishes
//! them to a repository contents API.
//!
//! Pipeline: [`extract`] rows → [`convert`] into records → [`document`] JSON
//! → optionally [`publish`] through a [`contract::ContentStore`] such as
//! [`github::GitHubClient`]. [`session::Session`] keeps the state an
//! interactive caller needs between those steps.

pub mod contract;
pub mod convert;
pub mod document;
pub mod extract;
pub mod filename;
pub mod github;
pub mod publish;
pub mod session;

pub use contract::{Document, Mode};
pub use convert::{convert, Conversion, ConvertError, ConvertWarning};
pub use publish::{publish, PublishError, PublishReceipt, UploadRequest};
