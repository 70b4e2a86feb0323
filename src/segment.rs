//! Read-only path-segment types consumed by [`crate::PathCombinator`].
//!
//! Path-segment discovery and beaconing are explicitly out of scope (§1) — in a full SCION
//! deployment these types are produced by a separate beaconing/path-store crate. Since this
//! repository has no such sibling crate to depend on, it defines the minimal, immutable shape
//! the combinator needs to compile and be tested against; see §3a of the expanded spec.

use crate::opaque_field::Hof;

/// A 64-bit (ISD, AS) identifier, the key SCION addresses an autonomous system by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsdAs(pub u64);

impl std::fmt::Display for IsdAs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let isd = self.0 >> 48;
        let as_ = self.0 & 0x0000_FFFF_FFFF_FFFF;
        write!(f, "{}-{}", isd, as_)
    }
}

/// The marking an AS makes of itself while beaconing: its identity and the HOF it minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcbMarking {
    /// The AS's own identifier.
    pub isd_as: IsdAs,
    /// The HOF this AS minted for this segment.
    pub hof: Hof,
}

/// A marking naming a peering link to another AS and the HOF minted for that link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerMarking {
    /// The identifier of the AS at the other end of the peering link.
    pub isd_as: IsdAs,
    /// The HOF minted for traversing the peering link.
    pub hof: Hof,
}

/// The path MTU extension an AS may attach to its marking, as referenced by §4.8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MtuExtension {
    /// The MTU this AS advertises for packets transiting it on this segment.
    pub mtu: u16,
}

/// One AS's full contribution to a beaconed segment: its own marking, any peering markings,
/// and extensions (of which only the MTU extension is modeled here, per §1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsMarking {
    /// This AS's own PCB marking.
    pub pcbm: PcbMarking,
    /// Peering links this AS advertises to ASes in sibling segments.
    pub pms: Vec<PeerMarking>,
    /// MTU extensions attached by this AS.
    pub ext: Vec<MtuExtension>,
}

/// A one-way beaconed path segment: one IOF and the ordered ASes it was recorded through.
///
/// `ases[0]` is always the core (or stub) AS the segment was beaconed from; later entries move
/// away from the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// The segment's IOF, as recorded by the beaconing AS.
    pub iof: crate::opaque_field::Iof,
    /// The ASes the segment traverses, core-first.
    pub ases: Vec<AsMarking>,
}

impl PathSegment {
    /// Returns the PCB marking of the first (core-most) AS, if any.
    pub fn first_pcbm(&self) -> Option<&PcbMarking> {
        self.ases.first().map(|a| &a.pcbm)
    }

    /// Returns the PCB marking of the last (leaf-most) AS, if any.
    pub fn last_pcbm(&self) -> Option<&PcbMarking> {
        self.ases.last().map(|a| &a.pcbm)
    }
}
