//! Core transform abstraction
//!
//! Each report description is reshaped by a [`Transformer`]; listing lives in
//! [`crate::reports::ReportsExtractor`] and loading in
//! [`crate::storage::ReportDirectory`].

mod transform;

pub use transform::Transformer;
