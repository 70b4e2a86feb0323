use scion_path::{parse_path, Hof, Iof, PathError};

fn write_iof(buf: &mut Vec<u8>, iof: &Iof) {
    iof.write(buf).unwrap();
}

fn write_hof(buf: &mut Vec<u8>, hof: &Hof) {
    hof.write(buf).unwrap();
}

#[test]
fn parses_a_two_segment_path_off_the_wire() {
    let up = Iof {
        up_flag: true,
        shortcut: false,
        peer: false,
        timestamp: 1_600_000_000,
        isd: 1,
        hops: 2,
    };
    let down = Iof {
        up_flag: false,
        shortcut: false,
        peer: false,
        timestamp: 1_600_000_000,
        isd: 1,
        hops: 2,
    };

    let mut raw = Vec::new();
    write_iof(&mut raw, &up);
    write_hof(
        &mut raw,
        &Hof { xover: false, verify_only: false, expiration: 63, ingress_if: 0, egress_if: 41, mac: [1, 2, 3] },
    );
    write_hof(
        &mut raw,
        &Hof { xover: true, verify_only: false, expiration: 63, ingress_if: 14, egress_if: 0, mac: [4, 5, 6] },
    );
    write_iof(&mut raw, &down);
    write_hof(
        &mut raw,
        &Hof { xover: true, verify_only: false, expiration: 63, ingress_if: 0, egress_if: 22, mac: [7, 8, 9] },
    );
    write_hof(
        &mut raw,
        &Hof { xover: false, verify_only: false, expiration: 63, ingress_if: 31, egress_if: 0, mac: [10, 11, 12] },
    );

    let path = parse_path(&raw).unwrap();
    assert_eq!(path.len(), raw.len());
    assert_eq!(path.get_as_hops(), 3);
    assert_eq!(path.pack().unwrap(), raw);
}

#[test]
fn empty_buffer_parses_to_an_empty_path() {
    let path = parse_path(&[]).unwrap();
    assert!(path.is_empty());
    assert_eq!(path.pack().unwrap(), Vec::<u8>::new());
}

#[test]
fn a_fourth_segment_is_never_consumed() {
    let iof = Iof { up_flag: true, shortcut: false, peer: false, timestamp: 0, isd: 1, hops: 1 };
    let hof = Hof { xover: false, verify_only: false, expiration: 1, ingress_if: 1, egress_if: 2, mac: [0; 3] };

    let mut raw = Vec::new();
    for _ in 0..3 {
        write_iof(&mut raw, &iof);
        write_hof(&mut raw, &hof);
    }
    // A fourth segment's worth of bytes trailing a full 3-segment path.
    write_iof(&mut raw, &iof);
    write_hof(&mut raw, &hof);

    let path = parse_path(&raw).unwrap();
    assert_eq!(path.len(), raw.len() - scion_path::OPAQUE_FIELD_LEN * 2);
}

#[test]
fn truncated_header_is_an_error() {
    let raw = vec![0u8; 3];
    assert!(matches!(parse_path(&raw), Err(PathError::InvalidPath(_))));
}
