use envr_types::{Element, Error, Path, TypeDescriptor, elements_match};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn p(s: &str) -> Path {
    Path::parse(s).unwrap()
}

#[test]
fn test_absolute_and_relative() {
    assert!(p("/a:int").is_absolute());
    assert!(!p("/a:int").is_root());
    assert!(p("a:int").is_relative());
    assert!(Path::root().is_root());
}

#[test]
fn test_type_and_erasure_come_from_last_element() {
    let path = p("/a/b:map<string,int>");
    assert_eq!(path.ty().to_string(), "map<string,int>");
    assert_eq!(path.erasure(), TypeDescriptor::named("map"));
}

#[test]
fn test_of_names() {
    let path = Path::of_names(&["db", "port"], TypeDescriptor::int()).unwrap();
    assert_eq!(path.to_string(), "db/port:int");
    assert_eq!(Path::of_names::<&str>(&[], TypeDescriptor::int()).unwrap(), Path::of_type(TypeDescriptor::int()));
}

#[test]
fn test_of_type_void_is_root() {
    assert!(Path::of_type(TypeDescriptor::Void).is_root());
}

#[test]
fn test_plus_rejects_untyped_tail() {
    let err = p("/a:int").plus(Element::named("b").unwrap()).unwrap_err();
    assert!(matches!(err, Error::InvalidPath { .. }));
}

#[test]
fn test_plus_rejects_root_in_the_middle() {
    assert!(p("/a:int").plus_path(&Path::root()).is_err());
}

#[test]
fn test_structural_equality_and_hash() {
    use std::collections::HashSet;

    let a = p("/a/b:int");
    let b = Path::of_elements(vec![
        Element::root(),
        Element::named("a").unwrap(),
        Element::of("b", TypeDescriptor::int()).unwrap(),
    ])
    .unwrap();
    assert!(!a.ptr_eq(&b));
    assert_eq!(a, b);

    let set: HashSet<_> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[rstest]
#[case("/a/b/c:int", "/a/b:int", true)]
#[case("/a/b/c:int", "/a:int", true)]
#[case("/a/b/c:int", "b/c:int", false)]
#[case("/a:int", "/a/b:int", false)]
fn test_starts_with_names(#[case] path: &str, #[case] prefix: &str, #[case] expected: bool) {
    let names = |h: &Element, q: &Element| h.name() == q.name();
    assert_eq!(p(path).starts_with_by(&p(prefix), names), expected);
}

#[test]
fn test_starts_with_self() {
    let path = p("/a/b:int");
    assert!(path.starts_with(&path));
    assert!(path.ends_with(&path.clone()));
    assert_eq!(path.index_of(&path), Some(0));
}

#[rstest]
#[case("/db/port:int", "port:int", true)]
#[case("/db/port:int", ":int", true)]
#[case("/db/port:int", ":any", false)]
#[case("/db/port:any", ":int", true)]
#[case("/db/port:list", "port:list<string>", true)]
#[case("/db/port:list<string>", "port:list", false)]
#[case("/db(int=1)/port:int", "db(int=2)/port:int", true)]
#[case("/db(int=1)/port:int", "db(string=2)/port:int", false)]
#[case("/db(int=1)/port:int", "db(int,int)/port:int", false)]
#[case("/db/port:int", "other/port:int", false)]
fn test_elements_match_as_suffix(#[case] path: &str, #[case] suffix: &str, #[case] expected: bool) {
    assert_eq!(p(path).ends_with_by(&p(suffix), elements_match), expected);
}

#[test]
fn test_wildcard_name_matches_any_name() {
    let named = Element::of("port", TypeDescriptor::int()).unwrap();
    let wildcard = Element::of_type(TypeDescriptor::int());
    assert!(elements_match(&named, &wildcard));
    assert!(elements_match(&wildcard, &named));
}

#[test]
fn test_iteration() {
    let path = p("/a/b:int");
    let names: Vec<_> = path.iter().map(Element::name).collect();
    assert_eq!(names, vec!["", "a", "b"]);
    assert_eq!((&path).into_iter().count(), 3);
}
