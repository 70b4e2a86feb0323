//! [`SCIONPath`]: the composed path header, its forwarding cursor, and reversal.

use std::io::Cursor;

use crate::error::{PathError, Result};
use crate::opaque_field::{self, Hof, Iof, OpaqueField, OPAQUE_FIELD_LEN};
use crate::opaque_field_list::{Label, OpaqueFieldList, HOF_LABELS, IOF_LABELS};
use crate::segment::IsdAs;

/// A composed, end-to-end SCION path header: up to three labeled segments plus the mutable
/// `(iof_idx, hof_idx)` cursor a forwarder walks during packet processing (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct SCIONPath {
    ofs: OpaqueFieldList,
    iof_idx: Option<usize>,
    hof_idx: Option<usize>,
    /// `(ISD-AS, interface-id)` pairs in travel order, populated by [`crate::PathCombinator`].
    /// Empty for paths produced by [`SCIONPath::parse`].
    pub interfaces: Vec<(IsdAs, u16)>,
    /// End-to-end path MTU, min-folded over contributing segments by the combinator. Zero for
    /// paths produced by [`SCIONPath::parse`].
    pub mtu: u16,
}

impl Default for SCIONPath {
    fn default() -> Self {
        SCIONPath::empty()
    }
}

impl SCIONPath {
    /// Returns an empty path: no segments, an undefined cursor, no interfaces, zero MTU.
    pub fn empty() -> SCIONPath {
        SCIONPath {
            ofs: OpaqueFieldList::new(),
            iof_idx: None,
            hof_idx: None,
            interfaces: Vec::new(),
            mtu: 0,
        }
    }

    /// Parses a path from its packed wire representation (§4.2, §6).
    ///
    /// Consumes up to three segments greedily. Empty input produces [`SCIONPath::empty`].
    pub fn parse(raw: &[u8]) -> Result<SCIONPath> {
        let mut path = SCIONPath::empty();
        let mut data = Cursor::new(raw);
        let total = raw.len() as u64;

        let mut a_iof: Option<Iof> = None;

        if data.position() < total {
            let iof = Self::parse_iof(&mut data)?;
            let hofs = opaque_field::parse_hofs(&mut data, iof.hops)?;
            path.ofs.set(Label::AIof, vec![OpaqueField::Iof(iof)]);
            path.ofs.set(Label::AHofs, hofs.into_iter().map(OpaqueField::Hof).collect());
            a_iof = Some(iof);
        }
        if data.position() < total {
            let iof = Self::parse_iof(&mut data)?;
            let hofs = opaque_field::parse_hofs(&mut data, iof.hops)?;
            path.ofs.set(Label::BIof, vec![OpaqueField::Iof(iof)]);
            path.ofs.set(Label::BHofs, hofs.into_iter().map(OpaqueField::Hof).collect());
        }
        if data.position() < total {
            if a_iof.map(|i| i.shortcut).unwrap_or(false) {
                return Err(PathError::InvalidPath(
                    "shortcut-flagged first segment cannot carry a third segment".to_string(),
                ));
            }
            let iof = Self::parse_iof(&mut data)?;
            let hofs = opaque_field::parse_hofs(&mut data, iof.hops)?;
            path.ofs.set(Label::CIof, vec![OpaqueField::Iof(iof)]);
            path.ofs.set(Label::CHofs, hofs.into_iter().map(OpaqueField::Hof).collect());
        }

        path.init_of_idxs();
        Ok(path)
    }

    fn parse_iof(data: &mut Cursor<&[u8]>) -> Result<Iof> {
        if (data.get_ref().len() as u64 - data.position()) < OPAQUE_FIELD_LEN as u64 {
            return Err(PathError::InvalidPath(
                "not enough bytes remaining for an info opaque field".to_string(),
            ));
        }
        Iof::parse(data)
    }

    /// Builds a path directly out of up to three already-constructed `(Iof, Vec<Hof>)`
    /// segments, assigning labels `A`, `B`, `C` in order. Used by the combinator, whose
    /// splicing logic always produces a contiguous prefix of present segments (§4.8).
    ///
    /// # Panics
    /// Panics if more than three segments are given, or if any segment's HOF count doesn't
    /// match its IOF's declared `hops` (invariant (iv), §3) — both are combinator bugs, not
    /// input errors.
    pub fn from_segments(segments: &[(Iof, Vec<Hof>)]) -> SCIONPath {
        assert!(segments.len() <= 3, "a SCIONPath has at most three segments");
        let labels = [
            (Label::AIof, Label::AHofs),
            (Label::BIof, Label::BHofs),
            (Label::CIof, Label::CHofs),
        ];
        let mut path = SCIONPath::empty();
        for (seg, (iof_label, hofs_label)) in segments.iter().zip(labels.iter()) {
            let (iof, hofs) = seg;
            assert_eq!(
                iof.hops as usize,
                hofs.len(),
                "IOF hop count must match the number of HOFs supplied"
            );
            path.ofs.set(*iof_label, vec![OpaqueField::Iof(*iof)]);
            path.ofs.set(*hofs_label, hofs.iter().copied().map(OpaqueField::Hof).collect());
        }
        path.init_of_idxs();
        path
    }

    /// Packs this path to its wire representation (§6). Inverse of [`SCIONPath::parse`] for the
    /// group contents (the cursor is not part of the wire format and is recomputed on parse).
    pub fn pack(&self) -> Result<Vec<u8>> {
        let raw = self.ofs.pack()?;
        debug_assert_eq!(raw.len(), self.len());
        Ok(raw)
    }

    /// Current `(iof_idx, hof_idx)` cursor, or `None` for an empty path.
    pub fn of_idxs(&self) -> Option<(usize, usize)> {
        match (self.iof_idx, self.hof_idx) {
            (Some(i), Some(h)) => Some((i, h)),
            _ => None,
        }
    }

    /// Overwrites the cursor directly. Callers are responsible for maintaining invariant (vi).
    pub fn set_of_idxs(&mut self, iof_idx: usize, hof_idx: usize) {
        self.iof_idx = Some(iof_idx);
        self.hof_idx = Some(hof_idx);
    }

    fn init_of_idxs(&mut self) {
        if self.ofs.is_empty() {
            self.iof_idx = None;
            self.hof_idx = None;
            return;
        }
        self.iof_idx = Some(0);
        self.hof_idx = Some(0);

        let iof = *self.current_iof().expect("non-empty path has a current IOF");
        if iof.peer {
            let hof = *self
                .ofs
                .get_by_idx(1)
                .expect("peer segment has at least one HOF")
                .as_hof()
                .expect("global index 1 of a non-empty path is a HOF");
            if hof.xover {
                self.hof_idx = Some(self.hof_idx.unwrap() + 1);
            }
        }
        self.inc_hof_idx();
    }

    fn current_iof(&self) -> Option<&Iof> {
        let idx = self.iof_idx?;
        Some(
            self.ofs
                .get_by_idx(idx)
                .expect("iof_idx must be a valid global index")
                .as_iof()
                .expect("iof_idx must reference an IOF"),
        )
    }

    fn current_hof(&self) -> Option<&Hof> {
        let idx = self.hof_idx?;
        Some(
            self.ofs
                .get_by_idx(idx)
                .expect("hof_idx must be a valid global index")
                .as_hof()
                .expect("hof_idx must reference a HOF"),
        )
    }

    /// Returns the current info opaque field, or `None` for an empty path.
    pub fn get_iof(&self) -> Option<&Iof> {
        self.current_iof()
    }

    /// Returns the current hop opaque field, or `None` for an empty path.
    pub fn get_hof(&self) -> Option<&Hof> {
        self.current_hof()
    }

    /// Advances `hof_idx` to the next routing HOF, skipping any `verify_only` HOFs and crossing
    /// into the next segment when the current one is exhausted (§4.3).
    ///
    /// # Panics
    /// Assumes a well-formed, non-empty cursor; panics if the path is empty.
    pub fn inc_hof_idx(&mut self) {
        let mut iof_idx = self.iof_idx.expect("inc_hof_idx requires a non-empty path");
        let mut hof_idx = self.hof_idx.expect("inc_hof_idx requires a non-empty path");
        let mut iof = *self
            .ofs
            .get_by_idx(iof_idx)
            .expect("iof_idx must be valid")
            .as_iof()
            .expect("iof_idx must reference an IOF");

        loop {
            hof_idx += 1;
            if hof_idx - iof_idx > iof.hops as usize {
                iof_idx = hof_idx;
                iof = *self
                    .ofs
                    .get_by_idx(iof_idx)
                    .expect("every segment is followed by another IOF or ends the path")
                    .as_iof()
                    .expect("segment boundary must land on an IOF");
                continue;
            }
            let hof = self
                .ofs
                .get_by_idx(hof_idx)
                .expect("hof_idx must be valid")
                .as_hof()
                .expect("hof_idx must reference a HOF");
            if !hof.verify_only {
                break;
            }
        }
        self.iof_idx = Some(iof_idx);
        self.hof_idx = Some(hof_idx);
    }

    /// Returns the interface to forward the current packet out on, or `0` for an empty path
    /// (§4.4).
    pub fn get_fwd_if(&self) -> u16 {
        let iof = match self.current_iof() {
            Some(iof) => iof,
            None => return 0,
        };
        let hof = self.current_hof().expect("non-empty path has a current HOF");
        if iof.up_flag {
            hof.ingress_if
        } else {
            hof.egress_if
        }
    }

    /// Returns the HOF needed to verify the current HOF's MAC, or `None` when no sibling HOF is
    /// needed (§4.5).
    pub fn get_hof_ver(&self, ingress: bool) -> Option<Hof> {
        let iof = *self.current_iof().expect("get_hof_ver requires a non-empty path");
        let hof = *self.current_hof().expect("get_hof_ver requires a non-empty path");
        let hof_idx = self.hof_idx.unwrap();

        if !hof.xover || (iof.shortcut && !iof.peer) {
            return self.get_hof_ver_normal(iof);
        }

        let offset: Option<isize> = if iof.peer {
            match (ingress, iof.up_flag) {
                (true, true) => Some(2),
                (true, false) => Some(1),
                (false, true) => Some(-1),
                (false, false) => Some(-2),
            }
        } else {
            match (ingress, iof.up_flag) {
                (true, true) => None,
                (true, false) => Some(-1),
                (false, true) => Some(1),
                (false, false) => None,
            }
        };

        let offset = offset?;
        let idx = (hof_idx as isize + offset) as usize;
        Some(*self.ofs.get_by_idx(idx).expect("verification HOF offset within bounds").as_hof().expect("verification offset must land on a HOF"))
    }

    fn get_hof_ver_normal(&self, iof: Iof) -> Option<Hof> {
        let iof_idx = self.iof_idx.unwrap();
        let hof_idx = self.hof_idx.unwrap();

        if (iof.up_flag && hof_idx == iof_idx + iof.hops as usize)
            || (!iof.up_flag && hof_idx == iof_idx + 1)
        {
            return None;
        }
        let offset: isize = if iof.up_flag { 1 } else { -1 };
        let idx = (hof_idx as isize + offset) as usize;
        Some(*self.ofs.get_by_idx(idx).expect("normal verification HOF offset within bounds").as_hof().expect("normal verification offset must land on a HOF"))
    }

    /// Flips the direction of travel so the same path can be used for a reply (§4.6).
    pub fn reverse(&mut self) {
        if self.ofs.is_empty() {
            return;
        }
        let iof_idx = self.iof_idx.unwrap();
        let hof_idx = self.hof_idx.unwrap();
        let iof_label = self
            .ofs
            .get_label_by_idx(iof_idx)
            .expect("cursor IOF index must be valid");

        let swap_pair = if self.ofs.count(Label::CIof) > 0 {
            Some((Label::CIof, Label::CHofs))
        } else if self.ofs.count(Label::BIof) > 0 {
            Some((Label::BIof, Label::BHofs))
        } else {
            None
        };

        if let Some((swap_iof, swap_hof)) = swap_pair {
            self.ofs.swap(Label::AIof, swap_iof);
            self.ofs.swap(Label::AHofs, swap_hof);
        }

        for label in IOF_LABELS {
            self.ofs.reverse_up_flag(label);
        }
        for label in HOF_LABELS {
            self.ofs.reverse_label(label);
        }

        let new_iof_idx = match swap_pair {
            Some((swap_iof, _)) if iof_label == Label::AIof => self
                .ofs
                .get_idx_by_label(swap_iof)
                .expect("swapped-in label is non-empty after reversal"),
            Some((swap_iof, _)) if iof_label == swap_iof => self
                .ofs
                .get_idx_by_label(Label::AIof)
                .expect("A_IOF is non-empty after reversal"),
            _ => self
                .ofs
                .get_idx_by_label(iof_label)
                .expect("original label is still non-empty after reversal"),
        };

        self.iof_idx = Some(new_iof_idx);
        self.hof_idx = Some(self.ofs.len() - hof_idx);
    }

    /// Total number of AS-level hops this path crosses (§4.7).
    pub fn get_as_hops(&self) -> u32 {
        let mut total: i64 = 0;
        let mut segs: i64 = 0;
        let mut peer = false;

        for &label in IOF_LABELS.iter() {
            let group = self.ofs.get_by_label(label);
            let iof = match group.first().and_then(OpaqueField::as_iof) {
                Some(iof) => iof,
                None => break,
            };
            peer |= iof.peer;
            total += Self::as_hops_for(iof);
            segs += 1;
        }
        if !peer {
            total -= segs - 1;
        }
        total.max(0) as u32
    }

    fn as_hops_for(iof: &Iof) -> i64 {
        if !iof.shortcut {
            iof.hops as i64
        } else if !iof.peer {
            iof.hops as i64 - 1
        } else {
            iof.hops as i64 - 2
        }
    }

    /// Path length in bytes.
    pub fn len(&self) -> usize {
        self.ofs.len() * OPAQUE_FIELD_LEN
    }

    /// `true` for an empty path.
    pub fn is_empty(&self) -> bool {
        self.ofs.is_empty()
    }
}

impl std::fmt::Display for SCIONPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "<SCION-Path>")?;
        for (name, iof_label, hofs_label) in [
            ("A", Label::AIof, Label::AHofs),
            ("B", Label::BIof, Label::BHofs),
            ("C", Label::CIof, Label::CHofs),
        ] {
            let iof_group = self.ofs.get_by_label(iof_label);
            let iof = match iof_group.first().and_then(OpaqueField::as_iof) {
                Some(iof) => iof,
                None => break,
            };
            writeln!(f, "  <{}-Segment>", name)?;
            writeln!(f, "    {:?}", iof)?;
            for hof in self.ofs.get_by_label(hofs_label) {
                writeln!(f, "    {:?}", hof)?;
            }
            writeln!(f, "  </{}-Segment>", name)?;
        }
        write!(f, "</SCION-Path>")
    }
}

/// Parses a path from its packed wire representation. The only external decoder entry point
/// (§6); `parse_path(b"")` yields [`SCIONPath::empty`].
pub fn parse_path(raw: &[u8]) -> Result<SCIONPath> {
    SCIONPath::parse(raw)
}
