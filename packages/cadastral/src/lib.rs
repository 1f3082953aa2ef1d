#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cadastral identifiers and object selection.
//!
//! Cadastral numbers arrive in several zero-padded spellings
//! (`50:41:0030401:1`, `50:41:30401:1`). This crate normalizes them into
//! a canonical form that is safe to embed in layer filter expressions, and
//! builds the layer selection parameters used to highlight an object of a
//! given type on the cadastre map service.

pub mod id;
pub mod object_type;
pub mod selection;

pub use id::{CadastralId, normalize_cadastral_id};
pub use object_type::ObjectType;
pub use selection::SelectionQuery;

use thiserror::Error;

/// Errors that can occur while parsing cadastral identifiers.
#[derive(Debug, Error)]
pub enum CadastralError {
    /// The input is not four colon-separated numeric segments.
    #[error("Malformed cadastral id: {input:?}")]
    MalformedId {
        /// The rejected input.
        input: String,
    },
}
