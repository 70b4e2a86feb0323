#![deny(missing_docs)]

//! The `scion-path` crate builds, parses and walks SCION inter-domain path headers.
//!
//! A SCION path header is a concatenation of up to three path segments, each a beaconed
//! sequence of per-AS hop opaque fields. [`SCIONPath`] holds one, parsed off the wire or built
//! from raw segments by [`PathCombinator`], and exposes the forwarding cursor a border router
//! walks hop by hop. [`PathCombinator`] builds those end-to-end paths out of independently
//! beaconed up-, down- and core-segments: straight through the core, or shortcut across a
//! crossover or peering link when one is available.
//!
//! # Examples
//!
//! ## Walking a freshly parsed path
//! ```
//! use scion_path::{parse_path, Hof, Iof};
//!
//! fn main() {
//!     let iof = Iof {
//!         up_flag: true,
//!         shortcut: false,
//!         peer: false,
//!         timestamp: 0,
//!         isd: 1,
//!         hops: 2,
//!     };
//!     let hofs = vec![
//!         Hof { xover: false, verify_only: false, expiration: 10, ingress_if: 0, egress_if: 41, mac: [0; 3] },
//!         Hof { xover: false, verify_only: false, expiration: 10, ingress_if: 14, egress_if: 0, mac: [0; 3] },
//!     ];
//!
//!     let mut raw = Vec::new();
//!     iof.write(&mut raw).unwrap();
//!     for hof in &hofs {
//!         hof.write(&mut raw).unwrap();
//!     }
//!
//!     let path = parse_path(&raw).unwrap();
//!     assert_eq!(path.get_fwd_if(), 0);
//! }
//! ```

/// Crate-wide error and result types.
pub mod error;

/// Wire-level opaque fields ([`Iof`], [`Hof`]).
pub mod opaque_field;

/// The labeled, flat-indexed container of opaque fields a [`SCIONPath`] is built from.
pub mod opaque_field_list;

/// Read-only path-segment types consumed by [`PathCombinator`].
pub mod segment;

/// [`SCIONPath`] itself: the composed header, forwarding cursor, and reversal.
pub mod path;

/// [`PathCombinator`]: construction of end-to-end paths from independently beaconed segments.
pub mod combinator;

pub use crate::combinator::{min_mtu, valid_mtu, PathCombinator};
pub use crate::error::{PathError, Result};
pub use crate::opaque_field::{Hof, Iof, OpaqueField, OPAQUE_FIELD_LEN};
pub use crate::opaque_field_list::{Label, OpaqueFieldList};
pub use crate::path::{parse_path, SCIONPath};
pub use crate::segment::{AsMarking, IsdAs, MtuExtension, PathSegment, PcbMarking, PeerMarking};

/// The minimum path MTU this crate will consider valid, matching the SCION minimum of the IPv6
/// minimum link MTU (§4.8).
pub const SCION_MIN_MTU: u16 = 1280;
