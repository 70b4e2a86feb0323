//! Wire-level opaque fields: the 8-byte atoms that make up a [`crate::SCIONPath`].
//!
//! An [`Iof`] heads a segment and records its direction and flags; the [`Hof`]s that follow it
//! each describe one AS-level hop. Both are fixed 8 bytes on the wire (§6 of the path-header
//! format) and are otherwise opaque to everything except the AS that minted them.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

use crate::error::{PathError, Result};

/// Wire length, in bytes, of every opaque field (IOF or HOF).
pub const OPAQUE_FIELD_LEN: usize = 8;

const IOF_UP_FLAG_MASK: u8 = 0b1000_0000;
const IOF_SHORTCUT_MASK: u8 = 0b0100_0000;
const IOF_PEER_MASK: u8 = 0b0010_0000;

const HOF_XOVER_MASK: u8 = 0b1000_0000;
const HOF_VERIFY_ONLY_MASK: u8 = 0b0100_0000;

/// Info Opaque Field: the per-segment header carrying direction, shortcut/peer flags, and the
/// number of [`Hof`]s that follow it in its segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iof {
    /// Set when the segment was recorded travelling away from the core (towards an end host).
    pub up_flag: bool,
    /// Set when this segment participates in a shortcut (crossover or peering) path.
    pub shortcut: bool,
    /// Set when the shortcut uses a peering link rather than a crossover link.
    ///
    /// Invariant: `peer` implies `shortcut`.
    pub peer: bool,
    /// Beaconing timestamp, seconds since the SCION epoch.
    pub timestamp: u32,
    /// ISD the segment was beaconed within.
    pub isd: u16,
    /// Number of [`Hof`]s following this IOF in its segment.
    pub hops: u8,
}

impl Iof {
    /// Decodes an [`Iof`] from its 8-byte wire representation.
    pub fn parse(stream: &mut impl Read) -> Result<Iof> {
        let flags = stream.read_u8()?;
        let timestamp = stream.read_u32::<BigEndian>()?;
        let isd = stream.read_u16::<BigEndian>()?;
        let hops = stream.read_u8()?;
        Ok(Iof {
            up_flag: flags & IOF_UP_FLAG_MASK != 0,
            shortcut: flags & IOF_SHORTCUT_MASK != 0,
            peer: flags & IOF_PEER_MASK != 0,
            timestamp,
            isd,
            hops,
        })
    }

    /// Encodes this IOF to its 8-byte wire representation.
    pub fn write(&self, write: &mut impl Write) -> Result<()> {
        let mut flags = 0u8;
        if self.up_flag {
            flags |= IOF_UP_FLAG_MASK;
        }
        if self.shortcut {
            flags |= IOF_SHORTCUT_MASK;
        }
        if self.peer {
            flags |= IOF_PEER_MASK;
        }
        write.write_u8(flags)?;
        write.write_u32::<BigEndian>(self.timestamp)?;
        write.write_u16::<BigEndian>(self.isd)?;
        write.write_u8(self.hops)?;
        Ok(())
    }
}

/// Hop Opaque Field: the per-hop header carrying ingress/egress interface IDs and the MAC that
/// authenticates the hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hof {
    /// Set on the HOF at a segment boundary that a path crosses between segments at.
    pub xover: bool,
    /// Set when this HOF is only used to verify a neighboring hop's MAC, never for routing.
    pub verify_only: bool,
    /// Expiration time, relative to the IOF timestamp, in the segment's expiration unit.
    pub expiration: u8,
    /// 12-bit interface ID the packet enters the AS on.
    pub ingress_if: u16,
    /// 12-bit interface ID the packet leaves the AS on.
    pub egress_if: u16,
    /// 24-bit MAC authenticating this hop (and, depending on position, its neighbors).
    pub mac: [u8; 3],
}

impl Hof {
    /// Decodes a [`Hof`] from its 8-byte wire representation.
    pub fn parse(stream: &mut impl Read) -> Result<Hof> {
        let flags = stream.read_u8()?;
        let expiration = stream.read_u8()?;
        let packed = stream.read_u16::<BigEndian>()?;
        let egress_lo = stream.read_u8()?;
        let mut mac = [0u8; 3];
        stream.read_exact(&mut mac)?;

        let ingress_if = packed >> 4;
        let egress_if = ((packed & 0x000F) << 8) | u16::from(egress_lo);

        Ok(Hof {
            xover: flags & HOF_XOVER_MASK != 0,
            verify_only: flags & HOF_VERIFY_ONLY_MASK != 0,
            expiration,
            ingress_if,
            egress_if,
            mac,
        })
    }

    /// Encodes this HOF to its 8-byte wire representation.
    pub fn write(&self, write: &mut impl Write) -> Result<()> {
        let mut flags = 0u8;
        if self.xover {
            flags |= HOF_XOVER_MASK;
        }
        if self.verify_only {
            flags |= HOF_VERIFY_ONLY_MASK;
        }
        write.write_u8(flags)?;
        write.write_u8(self.expiration)?;
        let packed = (self.ingress_if << 4) | (self.egress_if >> 8);
        write.write_u16::<BigEndian>(packed)?;
        write.write_u8((self.egress_if & 0xFF) as u8)?;
        write.write_all(&self.mac)?;
        Ok(())
    }
}

/// A decoded opaque field: either the segment-leading [`Iof`] or a hop-describing [`Hof`].
///
/// Modelled as a sum type (rather than two parallel untyped vectors) so that
/// [`crate::OpaqueFieldList::get_by_idx`] can hand back whichever variant actually lives at a
/// given position, and callers pattern-match instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueField {
    /// An info opaque field.
    Iof(Iof),
    /// A hop opaque field.
    Hof(Hof),
}

impl OpaqueField {
    /// Encodes this field to its 8-byte wire representation.
    pub fn write(&self, write: &mut impl Write) -> Result<()> {
        match self {
            OpaqueField::Iof(iof) => iof.write(write),
            OpaqueField::Hof(hof) => hof.write(write),
        }
    }

    /// Returns the inner [`Iof`], or `None` if this field is a [`Hof`].
    pub fn as_iof(&self) -> Option<&Iof> {
        match self {
            OpaqueField::Iof(iof) => Some(iof),
            OpaqueField::Hof(_) => None,
        }
    }

    /// Returns the inner [`Iof`] mutably, or `None` if this field is a [`Hof`].
    pub fn as_iof_mut(&mut self) -> Option<&mut Iof> {
        match self {
            OpaqueField::Iof(iof) => Some(iof),
            OpaqueField::Hof(_) => None,
        }
    }

    /// Returns the inner [`Hof`], or `None` if this field is an [`Iof`].
    pub fn as_hof(&self) -> Option<&Hof> {
        match self {
            OpaqueField::Hof(hof) => Some(hof),
            OpaqueField::Iof(_) => None,
        }
    }

    /// Returns the inner [`Hof`] mutably, or `None` if this field is an [`Iof`].
    pub fn as_hof_mut(&mut self) -> Option<&mut Hof> {
        match self {
            OpaqueField::Hof(hof) => Some(hof),
            OpaqueField::Iof(_) => None,
        }
    }
}

impl From<Iof> for OpaqueField {
    fn from(iof: Iof) -> Self {
        OpaqueField::Iof(iof)
    }
}

impl From<Hof> for OpaqueField {
    fn from(hof: Hof) -> Self {
        OpaqueField::Hof(hof)
    }
}

pub(crate) fn parse_hofs(data: &mut Cursor<&[u8]>, count: u8) -> Result<Vec<Hof>> {
    let mut hofs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        if (data.get_ref().len() as u64 - data.position()) < OPAQUE_FIELD_LEN as u64 {
            return Err(PathError::InvalidPath(
                "segment declares more hops than remain in the buffer".to_string(),
            ));
        }
        hofs.push(Hof::parse(data)?);
    }
    Ok(hofs)
}
