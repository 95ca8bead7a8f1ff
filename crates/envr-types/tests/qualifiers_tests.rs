use envr_types::{Error, Qualifiers};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

#[test]
fn test_contains_is_superset() {
    let wide = Qualifiers::of_pairs(&["env", "prod", "region", "eu", "tier", "web"]).unwrap();
    let narrow = Qualifiers::of_pairs(&["env", "prod", "tier", "web"]).unwrap();
    assert!(wide.contains(&narrow));
    assert!(!narrow.contains(&wide));
    assert!(narrow.is_subset_of(&wide));
}

#[test]
fn test_value_mismatch_breaks_containment() {
    let a = Qualifiers::of_pairs(&["env", "prod"]).unwrap();
    let b = Qualifiers::of_pairs(&["env", "dev"]).unwrap();
    assert!(!a.contains(&b));
    assert_eq!(a.intersection_size(&b), 0);
    assert_eq!(a.symmetric_difference_size(&b), 2);
}

#[test]
fn test_everything_contains_empty() {
    let q = Qualifiers::single("env", "prod");
    assert!(q.contains(&Qualifiers::empty()));
    assert!(Qualifiers::empty().is_subset_of(&q));
    assert!(!Qualifiers::empty().contains(&q));
}

#[test]
fn test_to_map_is_ordered() {
    let q: Qualifiers = [("b", "2"), ("a", "1")].into_iter().collect();
    let expected: BTreeMap<String, String> =
        [("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())].into();
    assert_eq!(q.to_map(), &expected);
}

#[test]
fn test_parse_ignores_empty_segments() {
    let q: Qualifiers = "env=prod;;region=eu;".parse().unwrap();
    assert_eq!(q.len(), 2);
    assert!("".parse::<Qualifiers>().unwrap().ptr_eq(&Qualifiers::empty()));
}

#[test]
fn test_parse_error() {
    let err = "env=prod;region".parse::<Qualifiers>().unwrap_err();
    assert_eq!(
        err,
        Error::InvalidQualifier {
            segment: "region".into()
        }
    );
}

#[test]
fn test_serde_as_map() {
    let q = Qualifiers::of_pairs(&["env", "prod", "region", "eu"]).unwrap();
    let json = serde_json::to_string(&q).unwrap();
    assert_eq!(json, r#"{"env":"prod","region":"eu"}"#);
    let back: Qualifiers = serde_json::from_str(&json).unwrap();
    assert_eq!(back, q);
}
