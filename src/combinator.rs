//! [`PathCombinator`]: stateless construction of end-to-end [`crate::SCIONPath`]s out of
//! independently-beaconed [`PathSegment`]s.

use crate::error::{PathError, Result};
use crate::opaque_field::{Hof, Iof};
use crate::path::SCIONPath;
use crate::segment::{AsMarking, PathSegment};
use crate::SCION_MIN_MTU;

/// `true` when `mtu` is a usable path MTU: nonzero and at least the IPv6 minimum.
pub fn valid_mtu(mtu: u16) -> bool {
    mtu != 0 && mtu >= SCION_MIN_MTU
}

/// The minimum of the given candidates, ignoring any that aren't [`valid_mtu`]; `0` if none are
/// valid.
pub fn min_mtu(candidates: &[u16]) -> u16 {
    candidates.iter().copied().filter(|&m| valid_mtu(m)).min().unwrap_or(0)
}

fn pick_furthest_from_core(points: &[(usize, usize)]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for &p in points {
        match best {
            None => best = Some(p),
            Some(b) if p.0 + p.1 > b.0 + b.1 => best = Some(p),
            _ => {}
        }
    }
    best
}

/// Builds end-to-end paths from the segments discovered by an (external) beaconing process.
///
/// Every method here is a pure function of its arguments: inputs are read-only for the
/// duration of the call, and every HOF/IOF placed into a result is a fresh copy, never an alias
/// of a source segment's fields (§5).
pub struct PathCombinator;

impl PathCombinator {
    /// Every shortcut path (crossover or peering) obtainable from some pair of an up- and a
    /// down-segment, deduplicated by value.
    pub fn build_shortcut_paths(ups: &[PathSegment], downs: &[PathSegment]) -> Vec<SCIONPath> {
        let mut paths = Vec::new();
        for up in ups {
            for down in downs {
                if let Some(path) = Self::build_shortcut_path(up, down) {
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
            }
        }
        paths
    }

    /// Every core path obtainable from `up` and `down`, either directly connected or via one of
    /// `cores`, deduplicated by value.
    pub fn build_core_paths(
        up: &PathSegment,
        down: &PathSegment,
        cores: &[PathSegment],
    ) -> Vec<SCIONPath> {
        let mut paths = Vec::new();
        if let Some(path) = Self::build_core_path(up, None, down) {
            paths.push(path);
        }
        for core in cores {
            if let Some(path) = Self::build_core_path(up, Some(core), down) {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }
        paths
    }

    /// Splices each `(up, core, down)` triple into one full path, skipping whichever segments
    /// are absent and the all-absent triple entirely.
    ///
    /// # Errors
    /// Returns [`PathError::MalformedCombine`] if a present segment carries an empty `ases`
    /// list (§7) — unlike [`Self::build_shortcut_paths`]/[`Self::build_core_paths`], which treat
    /// their (non-optional) `up`/`down` segments the same way but only ever need to report "no
    /// path found," this entry point takes segments that are optional in the first place, so an
    /// empty-but-present segment is unambiguously malformed input rather than an absent one.
    pub fn tuples_to_full_paths(
        triples: &[(Option<PathSegment>, Option<PathSegment>, Option<PathSegment>)],
    ) -> Result<Vec<SCIONPath>> {
        let mut out = Vec::new();
        for (up, core, down) in triples {
            if up.is_none() && core.is_none() && down.is_none() {
                continue;
            }
            for segment in [up, core, down].iter().filter_map(|s| s.as_ref()) {
                if segment.ases.is_empty() {
                    return Err(PathError::MalformedCombine);
                }
            }
            out.push(Self::splice_segments(up.as_ref(), core.as_ref(), down.as_ref()));
        }
        Ok(out)
    }

    fn build_shortcut_path(up: &PathSegment, down: &PathSegment) -> Option<SCIONPath> {
        if up.ases.is_empty() || down.ases.is_empty() {
            return None;
        }
        let (xovr, peer) = Self::get_xovr_peer(up, down);
        if xovr.is_none() && peer.is_none() {
            return None;
        }
        let sum = |pt: Option<(usize, usize)>| pt.map(|(a, b)| a + b).unwrap_or(0);
        if sum(peer) > sum(xovr) {
            Some(Self::join_shortcuts(up, down, peer.unwrap(), true))
        } else {
            Some(Self::join_shortcuts(up, down, xovr.unwrap(), false))
        }
    }

    fn build_core_path(
        up: &PathSegment,
        core: Option<&PathSegment>,
        down: &PathSegment,
    ) -> Option<SCIONPath> {
        if up.ases.is_empty() || down.ases.is_empty() {
            return None;
        }
        if !Self::check_connected(up, core, down) {
            return None;
        }
        Some(Self::splice_segments(Some(up), core, Some(down)))
    }

    fn check_connected(up: &PathSegment, core: Option<&PathSegment>, down: &PathSegment) -> bool {
        let up_first = match up.first_pcbm() {
            Some(p) => p.isd_as,
            None => return false,
        };
        let down_first = match down.first_pcbm() {
            Some(p) => p.isd_as,
            None => return false,
        };
        match core {
            Some(core) => {
                let core_first = match core.first_pcbm() {
                    Some(p) => p.isd_as,
                    None => return false,
                };
                let core_last = match core.last_pcbm() {
                    Some(p) => p.isd_as,
                    None => return false,
                };
                core_last == up_first && core_first == down_first
            }
            None => up_first == down_first,
        }
    }

    /// Copies whichever of `up`/`core`/`down` are present into a single path, marking xover
    /// boundaries between adjacent present segments and min-folding the MTU. Shared by
    /// [`Self::build_core_path`] (where `core` is optional, `up`/`down` are not) and
    /// [`Self::tuples_to_full_paths`] (where all three are optional).
    fn splice_segments(
        up: Option<&PathSegment>,
        core: Option<&PathSegment>,
        down: Option<&PathSegment>,
    ) -> SCIONPath {
        let up_copy = Self::copy_segment(up, false, core.is_some() || down.is_some(), true);
        let core_copy = Self::copy_segment(core, up.is_some(), down.is_some(), true);
        let down_copy = Self::copy_segment(down, up.is_some() || core.is_some(), false, false);

        let mut segments = Vec::new();
        let mut mtus = Vec::new();
        for copy in [&up_copy, &core_copy, &down_copy] {
            if let Some((iof, hofs, mtu)) = copy {
                segments.push((*iof, hofs.clone()));
                mtus.push(*mtu);
            }
        }

        let mut path = SCIONPath::from_segments(&segments);
        path.mtu = min_mtu(&mtus);

        let mut up_core: Vec<&AsMarking> = Vec::new();
        if let Some(up) = up {
            up_core.extend(up.ases.iter().rev());
        }
        if let Some(core) = core {
            up_core.extend(core.ases.iter().rev());
        }
        Self::add_interfaces(&mut path, &up_core, true);

        if let Some(down) = down {
            let down_ases: Vec<&AsMarking> = down.ases.iter().collect();
            Self::add_interfaces(&mut path, &down_ases, false);
        }

        path
    }

    fn add_interfaces(path: &mut SCIONPath, ases: &[&AsMarking], up: bool) {
        for block in ases {
            let isd_as = block.pcbm.isd_as;
            let egress = block.pcbm.hof.egress_if;
            let ingress = block.pcbm.hof.ingress_if;
            if up {
                if egress != 0 {
                    path.interfaces.push((isd_as, egress));
                }
                if ingress != 0 {
                    path.interfaces.push((isd_as, ingress));
                }
            } else {
                if ingress != 0 {
                    path.interfaces.push((isd_as, ingress));
                }
                if egress != 0 {
                    path.interfaces.push((isd_as, egress));
                }
            }
        }
    }

    fn copy_segment(
        segment: Option<&PathSegment>,
        xover_start: bool,
        xover_end: bool,
        up: bool,
    ) -> Option<(Iof, Vec<Hof>, u16)> {
        let segment = segment?;
        let mut iof = segment.iof;
        iof.up_flag = up;
        let (mut hofs, mtu) = Self::copy_hofs(&segment.ases, up);
        if let Some(first) = hofs.first_mut() {
            if xover_start {
                first.xover = true;
            }
        }
        if let Some(last) = hofs.last_mut() {
            if xover_end {
                last.xover = true;
            }
        }
        Some((iof, hofs, mtu))
    }

    fn copy_hofs(ases: &[AsMarking], reverse: bool) -> (Vec<Hof>, u16) {
        let mut mtu = 0u16;
        let mut hofs = Vec::with_capacity(ases.len());
        for block in ases {
            for ext in &block.ext {
                mtu = min_mtu(&[mtu, ext.mtu]);
            }
            hofs.push(block.pcbm.hof);
        }
        if reverse {
            hofs.reverse();
        }
        (hofs, mtu)
    }

    /// Finds the shortest (furthest-from-core) crossover and peer points between `up` and
    /// `down` (§4.8). Ties are broken by keeping the first candidate found, matching the
    /// iteration order below.
    fn get_xovr_peer(
        up: &PathSegment,
        down: &PathSegment,
    ) -> (Option<(usize, usize)>, Option<(usize, usize)>) {
        let mut xovrs = Vec::new();
        let mut peers = Vec::new();

        for (up_i, up_as) in up.ases.iter().enumerate().skip(1) {
            for (down_i, down_as) in down.ases.iter().enumerate().skip(1) {
                if up_as.pcbm.isd_as == down_as.pcbm.isd_as {
                    xovrs.push((up_i, down_i));
                    continue;
                }
                for up_peer in &up_as.pms {
                    for down_peer in &down_as.pms {
                        if up_peer.isd_as == down_as.pcbm.isd_as
                            && down_peer.isd_as == up_as.pcbm.isd_as
                        {
                            peers.push((up_i, down_i));
                        }
                    }
                }
            }
        }

        (pick_furthest_from_core(&xovrs), pick_furthest_from_core(&peers))
    }

    fn copy_segment_shortcut(segment: &PathSegment, index: usize, up: bool) -> (Iof, Vec<Hof>, Hof, u16) {
        let mut iof = segment.iof;
        iof.hops -= index as u8;
        iof.up_flag = up;

        let (mut hofs, mtu) = Self::copy_hofs(&segment.ases[index..], up);
        let xovr_idx = if up { hofs.len() - 1 } else { 0 };
        hofs[xovr_idx].xover = true;

        let mut upstream_hof = segment.ases[index - 1].pcbm.hof;
        upstream_hof.xover = false;
        upstream_hof.verify_only = true;

        (iof, hofs, upstream_hof, mtu)
    }

    fn join_shortcuts_peer(up_as: &AsMarking, down_as: &AsMarking) -> Option<(Hof, Hof)> {
        for up_peer in &up_as.pms {
            for down_peer in &down_as.pms {
                if up_peer.isd_as == down_as.pcbm.isd_as && down_peer.isd_as == up_as.pcbm.isd_as {
                    return Some((up_peer.hof, down_peer.hof));
                }
            }
        }
        None
    }

    fn join_shortcuts(
        up: &PathSegment,
        down: &PathSegment,
        point: (usize, usize),
        peer: bool,
    ) -> SCIONPath {
        let (up_index, down_index) = point;

        let (mut up_iof, mut up_hofs, up_upstream, up_mtu) =
            Self::copy_segment_shortcut(up, up_index, true);
        let (mut down_iof, mut down_hofs, down_upstream, down_mtu) =
            Self::copy_segment_shortcut(down, down_index, false);

        up_iof.shortcut = true;
        down_iof.shortcut = true;

        let (up_peer_hof, down_peer_hof) = if !peer {
            up_iof.peer = false;
            down_iof.peer = false;
            up_hofs.push(up_upstream);
            down_hofs.insert(0, down_upstream);
            (None, None)
        } else {
            up_iof.peer = true;
            down_iof.peer = true;
            let (uph, dph) = Self::join_shortcuts_peer(&up.ases[up_index], &down.ases[down_index])
                .expect("a detected peer point always has a mirrored peering marking");
            up_hofs.push(uph);
            up_hofs.push(up_upstream);
            down_hofs.insert(0, dph);
            down_hofs.insert(0, down_upstream);
            (Some(uph), Some(dph))
        };

        let mut segments = Vec::new();
        // Any shortcut side with 2 HOFs or fewer is redundant and is dropped (§4.8).
        if up_hofs.len() > 2 {
            up_iof.hops = up_hofs.len() as u8;
            segments.push((up_iof, up_hofs));
        }
        if down_hofs.len() > 2 {
            down_iof.hops = down_hofs.len() as u8;
            segments.push((down_iof, down_hofs));
        }
        let mut path = SCIONPath::from_segments(&segments);

        for i in (up_index..up.ases.len()).rev() {
            let pcbm = &up.ases[i].pcbm;
            if pcbm.hof.egress_if != 0 {
                path.interfaces.push((pcbm.isd_as, pcbm.hof.egress_if));
            }
            if i != up_index {
                path.interfaces.push((pcbm.isd_as, pcbm.hof.ingress_if));
            }
        }
        if peer {
            let up_pcbm = &up.ases[up_index].pcbm;
            let down_pcbm = &down.ases[down_index].pcbm;
            path.interfaces.push((up_pcbm.isd_as, up_peer_hof.unwrap().ingress_if));
            path.interfaces.push((down_pcbm.isd_as, down_peer_hof.unwrap().ingress_if));
        }
        for i in down_index..down.ases.len() {
            let pcbm = &down.ases[i].pcbm;
            if i != down_index {
                path.interfaces.push((pcbm.isd_as, pcbm.hof.ingress_if));
            }
            if pcbm.hof.egress_if != 0 {
                path.interfaces.push((pcbm.isd_as, pcbm.hof.egress_if));
            }
        }

        path.mtu = min_mtu(&[up_mtu, down_mtu]);
        path
    }
}
