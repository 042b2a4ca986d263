use submodel_path::{format_path, is_child, normalize_path, parse_path, PathError, PathSegment};

#[test]
fn wire_paths_round_trip_through_parse_and_format() {
    for input in [
        "GeneralInformation",
        "Markings/0",
        "Markings/0/MarkingName",
        "Documents/10/DocumentVersion/Language",
    ] {
        let path = parse_path(input).unwrap();
        assert_eq!(format_path(&path), input, "round trip failed for {input}");
    }
}

#[test]
fn numeric_segments_always_parse_as_indices() {
    // The node type decides whether an index is legal at a given depth;
    // the parser only classifies the segment shape.
    let path = parse_path("0").unwrap();
    assert_eq!(path, vec![PathSegment::Index(0)]);

    let path = parse_path("Materials/42").unwrap();
    assert_eq!(path[1], PathSegment::Index(42));
}

#[test]
fn names_with_digits_are_not_indices() {
    let path = parse_path("Sensor1/Value2").unwrap();
    assert_eq!(path[0], PathSegment::Name("Sensor1".to_string()));
    assert_eq!(path[1], PathSegment::Name("Value2".to_string()));
}

#[test]
fn normalized_form_is_stable_across_indices() {
    let a = parse_path("Materials/0/Name").unwrap();
    let b = parse_path("Materials/17/Name").unwrap();
    assert_eq!(normalize_path(&a), normalize_path(&b));
}

#[test]
fn malformed_paths_are_rejected() {
    assert_eq!(parse_path(""), Err(PathError::Empty));
    assert_eq!(parse_path("a//b"), Err(PathError::EmptySegment(1)));
    assert_eq!(parse_path("trailing/"), Err(PathError::EmptySegment(1)));
}

#[test]
fn is_child_requires_proper_prefix() {
    let list = parse_path("Materials").unwrap();
    let item = parse_path("Materials/0").unwrap();
    let other = parse_path("Documents/0").unwrap();
    assert!(is_child(&list, &item));
    assert!(!is_child(&item, &list));
    assert!(!is_child(&list, &other));
    assert!(!is_child(&list, &list));
}
