//! Docpack archive codec
//!
//! A docpack is a ZIP container of JSON members. Two generations exist side by side: the current
//! graph/documentation/metadata shape and the legacy manifest/symbols/docs shape. Decoding detects which
//! one it is looking at and yields the same [`Archive`](crate::domain::archive::Archive) model for both.

mod codec;
mod error;

pub use codec::{
    DOCS_BUNDLE_MEMBER, DOCS_DIR, DOCUMENTATION_MEMBER, GRAPH_MEMBER, MANIFEST_MEMBER,
    METADATA_MEMBER, SYMBOLS_MEMBER, decode, encode,
};
pub use error::{CONTAINER, DecodeError, EncodeError};
