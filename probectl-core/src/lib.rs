#![doc = "probectl-core: core logic library for probectl."]

//! This crate contains the bulk probe-configuration pipeline used by the
//! `probectl` CLI: the portable file format, batch validation, duplicate
//! detection against the remote collection, and the import/export drivers.
//! Transport lives outside this crate behind [`contract::ProbeApi`].
//!
//! # Usage
//! Build a [`reconcile::ImportRequest`] and call [`reconcile::import`] with a
//! `ProbeApi` handle, or [`export::export_probes`] to go the other way.

pub mod codec;
pub mod contract;
pub mod convert;
pub mod error;
pub mod export;
pub mod format;
pub mod index;
pub mod model;
pub mod reconcile;
pub mod validate;

pub use error::{ErrorKind, PipelineError};
