//! Core data types for sequence detection.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Range`]: A half-open search interval over a reference, with tolerant resolution
//! - [`Query`]: A short sequence (adapter, barcode, motif) in one orientation
//! - [`Reference`]: A long sequence (e.g. a read) with its candidate search ranges
//! - [`AlignedSeq`]: One detected occurrence of a query inside a reference
//!
//! ## Coordinates
//!
//! All coordinates are 0-based and half-open. Hit coordinates on the reference
//! are always absolute positions in the full reference sequence, whatever range
//! was searched.
//!
//! [`Range`]: range::Range
//! [`Query`]: query::Query
//! [`Reference`]: reference::Reference
//! [`AlignedSeq`]: hit::AlignedSeq

pub mod hit;
pub mod query;
pub mod range;
pub mod reference;
pub mod sequence;
