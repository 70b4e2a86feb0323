//! [`OpaqueFieldList`]: a fixed label order over opaque fields, with both per-label and flat
//! global-index access.
//!
//! A [`crate::SCIONPath`] needs two incompatible views of the same data: six named groups (for
//! editing operations like swap and reverse-on-reversal), and one flat sequence (for the
//! forwarding cursor). Per the design note in the distilled spec, this keeps a single flat
//! `Vec<OpaqueField>` plus a small table of byte-offset-free `Range<usize>`s, one per label, so
//! global indexing is O(1) instead of being recomputed by walking every group on each access.

use std::ops::Range;

use crate::error::{PathError, Result};
use crate::opaque_field::OpaqueField;

/// The six labeled groups that make up a [`crate::SCIONPath`], in their fixed wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// The first segment's IOF.
    AIof,
    /// The first segment's HOFs.
    AHofs,
    /// The second segment's IOF.
    BIof,
    /// The second segment's HOFs.
    BHofs,
    /// The third segment's IOF.
    CIof,
    /// The third segment's HOFs.
    CHofs,
}

/// Declared label order: `A_IOF, A_HOFS, B_IOF, B_HOFS, C_IOF, C_HOFS` (§3, §6).
pub const OF_ORDER: [Label; 6] = [
    Label::AIof,
    Label::AHofs,
    Label::BIof,
    Label::BHofs,
    Label::CIof,
    Label::CHofs,
];

/// The three IOF labels, in segment order.
pub const IOF_LABELS: [Label; 3] = [Label::AIof, Label::BIof, Label::CIof];
/// The three HOFS labels, in segment order.
pub const HOF_LABELS: [Label; 3] = [Label::AHofs, Label::BHofs, Label::CHofs];

impl Label {
    fn slot(self) -> usize {
        OF_ORDER.iter().position(|&l| l == self).expect("OF_ORDER covers every label")
    }
}

/// An ordered container of labeled opaque-field groups, indexable both by label and by a flat
/// global position across every group (§4.1).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpaqueFieldList {
    fields: Vec<OpaqueField>,
    ranges: [Range<usize>; 6],
}

impl OpaqueFieldList {
    /// Builds an empty list with every label's group empty.
    pub fn new() -> OpaqueFieldList {
        OpaqueFieldList {
            fields: Vec::new(),
            ranges: Default::default(),
        }
    }

    /// Replaces the group stored at `label`.
    pub fn set(&mut self, label: Label, group: Vec<OpaqueField>) {
        let slot = label.slot();
        let old_range = self.ranges[slot].clone();
        let delta = group.len() as isize - old_range.len() as isize;

        self.fields.splice(old_range.clone(), group);
        self.ranges[slot] = old_range.start..(old_range.start + (old_range.len() as isize + delta) as usize);

        for other in self.ranges.iter_mut().skip(slot + 1) {
            let shifted_start = (other.start as isize + delta) as usize;
            let shifted_end = (other.end as isize + delta) as usize;
            *other = shifted_start..shifted_end;
        }
    }

    /// Returns the current group stored at `label`.
    pub fn get_by_label(&self, label: Label) -> &[OpaqueField] {
        &self.fields[self.ranges[label.slot()].clone()]
    }

    /// Returns the number of fields stored at `label`.
    pub fn count(&self, label: Label) -> usize {
        self.ranges[label.slot()].len()
    }

    /// Returns the field at global index `i` (label order × insertion order).
    pub fn get_by_idx(&self, i: usize) -> Result<&OpaqueField> {
        self.fields.get(i).ok_or(PathError::IndexOutOfRange {
            index: i,
            len: self.fields.len(),
        })
    }

    /// Returns the field at global index `i`, mutably.
    pub fn get_by_idx_mut(&mut self, i: usize) -> Result<&mut OpaqueField> {
        let len = self.fields.len();
        self.fields
            .get_mut(i)
            .ok_or(PathError::IndexOutOfRange { index: i, len })
    }

    /// Returns the label whose group contains global index `i`.
    pub fn get_label_by_idx(&self, i: usize) -> Result<Label> {
        if i >= self.fields.len() {
            return Err(PathError::IndexOutOfRange {
                index: i,
                len: self.fields.len(),
            });
        }
        for &label in OF_ORDER.iter() {
            if self.ranges[label.slot()].contains(&i) {
                return Ok(label);
            }
        }
        unreachable!("every valid index belongs to exactly one label's range")
    }

    /// Returns the global index of the first field at `label`, or `EmptyLabel` if its group is
    /// empty.
    pub fn get_idx_by_label(&self, label: Label) -> Result<usize> {
        let range = &self.ranges[label.slot()];
        if range.is_empty() {
            return Err(PathError::EmptyLabel(label));
        }
        Ok(range.start)
    }

    /// Exchanges the groups stored at `a` and `b`.
    pub fn swap(&mut self, a: Label, b: Label) {
        let a_group = self.get_by_label(a).to_vec();
        let b_group = self.get_by_label(b).to_vec();
        // Apply in ascending-slot order so the second `set` doesn't operate on stale ranges.
        if a.slot() <= b.slot() {
            self.set(a, b_group);
            self.set(b, a_group);
        } else {
            self.set(b, a_group);
            self.set(a, b_group);
        }
    }

    /// Reverses the sequence stored at `label` in place.
    pub fn reverse_label(&mut self, label: Label) {
        self.fields[self.ranges[label.slot()].clone()].reverse();
    }

    /// If `label`'s group holds exactly one IOF, flips its `up_flag`. Does nothing if the group
    /// is empty.
    pub fn reverse_up_flag(&mut self, label: Label) {
        let range = self.ranges[label.slot()].clone();
        if range.is_empty() {
            return;
        }
        if let Some(iof) = self.fields[range].iter_mut().find_map(OpaqueField::as_iof_mut) {
            iof.up_flag = !iof.up_flag;
        }
    }

    /// Concatenates every field, in global order, to its packed wire bytes.
    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.fields.len() * crate::opaque_field::OPAQUE_FIELD_LEN);
        for field in &self.fields {
            field.write(&mut buf)?;
        }
        Ok(buf)
    }

    /// Total number of fields across every group.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if no group holds any fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
