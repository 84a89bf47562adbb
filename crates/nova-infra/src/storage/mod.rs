//! Blob persistence.

pub mod json_blob;
