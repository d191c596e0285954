use glyphmesh::{ErrorKind, Shape};

fn sample() -> Shape {
    let mut shape = Shape::new();
    shape.add_vertex(0.0, 0.0);
    shape.add_vertex(0.125, 0.25);
    shape.add_vertex(-1.5, 3.0e-5);
    shape.add_segment(0, 1);
    shape.add_segment(1, 2);
    shape.add_segment(2, 0);
    shape
}

#[test]
fn round_trip_is_exact() {
    let shape = sample();
    let mut text = Vec::new();
    shape.write(&mut text).unwrap();
    let reloaded = Shape::read(&text[..]).unwrap();
    assert_eq!(shape, reloaded);
}

#[test]
fn records_interleave() {
    let text = b"v: 0, 0\nv: 1, 0\ns: 0, 1\nv: 0.5, 1\ns: 1, 2\ns: 2, 0\n";
    let shape = Shape::read(&text[..]).unwrap();
    assert_eq!(shape.vertices.len(), 3);
    assert_eq!(shape.segments, vec![(0, 1), (1, 2), (2, 0)]);
}

#[test]
fn malformed_records_abort() {
    assert!(Shape::read(&b"x: 1, 2\n"[..]).is_err());
    assert!(Shape::read(&b"v: 1\n"[..]).is_err());
    assert!(Shape::read(&b"v: a, b\n"[..]).is_err());
    assert!(Shape::read(&b"s: 0, 1\n"[..]).is_err());

    // Segments may only reference vertices declared before them.
    let err = Shape::read(&b"v: 0, 0\ns: 0, 1\n"[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Container);
}

#[test]
fn empty_file_is_an_empty_shape() {
    let shape = Shape::read(&b""[..]).unwrap();
    assert!(shape.vertices.is_empty());
    assert!(shape.segments.is_empty());
}
