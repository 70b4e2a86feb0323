//! Crate-wide error type.
//!
//! The teacher crate this one is grown from (`bgp-rs`) reports every failure as a bare
//! `std::io::Error` with `ErrorKind::Other`, which is fine when there's only ever one way to
//! fail. This crate's invariants (§7) distinguish four genuinely different failure kinds, so
//! they get their own enum instead of being flattened into a string.

use thiserror::Error;

/// The result type returned by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, PathError>;

/// Everything that can go wrong while parsing or combining SCION paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// The wire buffer was malformed: truncated mid-segment, or a shortcut-flagged first
    /// segment was followed by a third segment.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// An [`crate::OpaqueFieldList`] was indexed beyond its total length.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The total number of fields currently stored.
        len: usize,
    },

    /// [`crate::OpaqueFieldList::get_idx_by_label`] was called on a label with no fields.
    #[error("label {0:?} has no fields")]
    EmptyLabel(crate::opaque_field_list::Label),

    /// A [`crate::segment::PathSegment`] passed to the combinator was non-empty but carried no
    /// AS markings.
    #[error("malformed combine input: segment has no AS entries")]
    MalformedCombine,

    /// Wrapped I/O failure from the underlying byte cursor (should only occur on a severely
    /// truncated buffer that the length pre-checks failed to catch).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
