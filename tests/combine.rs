use scion_path::{
    AsMarking, Hof, Iof, IsdAs, MtuExtension, PathCombinator, PathSegment, PcbMarking, PeerMarking,
};

fn hof(ingress: u16, egress: u16) -> Hof {
    Hof { xover: false, verify_only: false, expiration: 10, ingress_if: ingress, egress_if: egress, mac: [0; 3] }
}

fn iof(up_flag: bool, hops: u8) -> Iof {
    Iof { up_flag, shortcut: false, peer: false, timestamp: 0, isd: 1, hops }
}

fn as_marking(isd_as: u64, ingress: u16, egress: u16) -> AsMarking {
    AsMarking {
        pcbm: PcbMarking { isd_as: IsdAs(isd_as), hof: hof(ingress, egress) },
        pms: Vec::new(),
        ext: Vec::new(),
    }
}

// S4: no core segment connects a core AS straight to an up- and a down-segment that both
// originate at it.
#[test]
fn build_core_paths_without_a_core_segment_joins_directly() {
    let up = PathSegment {
        iof: iof(true, 2),
        ases: vec![as_marking(1, 0, 11), as_marking(2, 12, 0)],
    };
    let down = PathSegment {
        iof: iof(false, 2),
        ases: vec![as_marking(1, 0, 21), as_marking(3, 22, 0)],
    };

    let paths = PathCombinator::build_core_paths(&up, &down, &[]);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].get_as_hops(), 3);
    assert_eq!(paths[0].interfaces.len(), 4);
}

// A three-segment core path: up and down connect through a distinct core segment.
#[test]
fn build_core_paths_through_a_core_segment() {
    let up = PathSegment {
        iof: iof(true, 2),
        ases: vec![as_marking(10, 0, 11), as_marking(2, 12, 0)],
    };
    let core = PathSegment {
        iof: iof(true, 2),
        ases: vec![as_marking(20, 0, 31), as_marking(10, 32, 0)],
    };
    let down = PathSegment {
        iof: iof(false, 2),
        ases: vec![as_marking(20, 0, 41), as_marking(3, 42, 0)],
    };

    let paths = PathCombinator::build_core_paths(&up, &down, &[core]);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].get_as_hops(), 4);
}

// A shared AS between the up- and down-segment is taken as a crossover shortcut point.
#[test]
fn build_shortcut_paths_crosses_over_at_a_shared_as() {
    let up = PathSegment {
        iof: iof(true, 3),
        ases: vec![as_marking(1, 0, 0), as_marking(50, 0, 51), as_marking(100, 52, 0)],
    };
    let down = PathSegment {
        iof: iof(false, 3),
        ases: vec![as_marking(1, 0, 0), as_marking(50, 0, 61), as_marking(200, 62, 0)],
    };

    let paths = PathCombinator::build_shortcut_paths(&[up], &[down]);
    assert_eq!(paths.len(), 1);
    let path_iof = paths[0].get_iof().unwrap();
    assert!(path_iof.shortcut);
    assert!(!path_iof.peer);
}

// Disjoint segments with no shared AS and no mirrored peering link produce nothing.
#[test]
fn build_shortcut_paths_finds_nothing_when_disjoint() {
    let up = PathSegment { iof: iof(true, 1), ases: vec![as_marking(1, 0, 11)] };
    let down = PathSegment { iof: iof(false, 1), ases: vec![as_marking(2, 0, 21)] };
    assert!(PathCombinator::build_shortcut_paths(&[up], &[down]).is_empty());
}

// A mirrored peering link between a non-core AS on each side is preferred as a shortcut.
#[test]
fn build_shortcut_paths_prefers_a_peering_link() {
    let mut up_leaf = as_marking(100, 52, 0);
    up_leaf.pms.push(PeerMarking { isd_as: IsdAs(200), hof: hof(99, 0) });
    let up = PathSegment {
        iof: iof(true, 2),
        ases: vec![as_marking(1, 0, 0), up_leaf],
    };

    let mut down_leaf = as_marking(200, 62, 0);
    down_leaf.pms.push(PeerMarking { isd_as: IsdAs(100), hof: hof(0, 88) });
    let down = PathSegment {
        iof: iof(false, 2),
        ases: vec![as_marking(1, 0, 0), down_leaf],
    };

    let paths = PathCombinator::build_shortcut_paths(&[up], &[down]);
    assert_eq!(paths.len(), 1);
    let path_iof = paths[0].get_iof().unwrap();
    assert!(path_iof.shortcut);
    assert!(path_iof.peer);
}

// Reversing a three-segment (A/B/C) core path. The middle segment's label never swaps, so a
// cursor starting there must stay on the same label after reversal; cursors starting on A or on
// the swapped-in C must land on each other's (now-swapped) label. All three starting positions
// are checked, per the combinator's own reversal design note about the three-segment case being
// the one implementers get wrong.
#[test]
fn reverse_three_segment_core_path_leaves_middle_segment_untouched() {
    let up = PathSegment {
        iof: iof(true, 2),
        ases: vec![as_marking(10, 0, 11), as_marking(2, 12, 0)],
    };
    let core = PathSegment {
        iof: iof(true, 2),
        ases: vec![as_marking(20, 0, 31), as_marking(10, 32, 0)],
    };
    let down = PathSegment {
        iof: iof(false, 2),
        ases: vec![as_marking(20, 0, 41), as_marking(3, 42, 0)],
    };

    let paths = PathCombinator::build_core_paths(&up, &down, &[core]);
    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    assert_eq!(path.of_idxs(), Some((0, 1)));

    // Layout: A_IOF=0, A_HOFS=[1,2], B_IOF=3, B_HOFS=[4,5], C_IOF=6, C_HOFS=[7,8].

    // Cursor on A: lands on the swapped-in label (old C's slot), same HOF content.
    let mut on_a = path.clone();
    on_a.set_of_idxs(0, 1);
    let hof_on_a = *on_a.get_hof().unwrap();
    on_a.reverse();
    assert_eq!(on_a.of_idxs(), Some((6, 8)));
    assert_eq!(*on_a.get_hof().unwrap(), hof_on_a);
    assert!(on_a.get_iof().unwrap().up_flag);

    // Cursor on the swapped-in C: lands back on A, same HOF content.
    let mut on_c = path.clone();
    on_c.set_of_idxs(6, 7);
    let hof_on_c = *on_c.get_hof().unwrap();
    on_c.reverse();
    assert_eq!(on_c.of_idxs(), Some((0, 2)));
    assert_eq!(*on_c.get_hof().unwrap(), hof_on_c);
    assert!(!on_c.get_iof().unwrap().up_flag);

    // Cursor on the untouched middle segment B: label (iof_idx) is unchanged, same HOF content.
    let mut on_b = path.clone();
    on_b.set_of_idxs(3, 4);
    let hof_on_b = *on_b.get_hof().unwrap();
    on_b.reverse();
    assert_eq!(on_b.of_idxs(), Some((3, 5)));
    assert_eq!(*on_b.get_hof().unwrap(), hof_on_b);
}

#[test]
fn mtu_is_min_folded_and_zero_mtus_are_ignored() {
    let mut up = PathSegment { iof: iof(true, 1), ases: vec![as_marking(1, 0, 11)] };
    up.ases[0].ext.push(MtuExtension { mtu: 1500 });
    let mut down = PathSegment { iof: iof(false, 1), ases: vec![as_marking(1, 0, 21)] };
    down.ases[0].ext.push(MtuExtension { mtu: 1300 });

    let paths = PathCombinator::build_core_paths(&up, &down, &[]);
    assert_eq!(paths[0].mtu, 1300);
}

#[test]
fn unadvertised_mtu_falls_back_to_zero() {
    let up = PathSegment { iof: iof(true, 1), ases: vec![as_marking(1, 0, 11)] };
    let down = PathSegment { iof: iof(false, 1), ases: vec![as_marking(1, 0, 21)] };

    let paths = PathCombinator::build_core_paths(&up, &down, &[]);
    assert_eq!(paths[0].mtu, 0);
}
