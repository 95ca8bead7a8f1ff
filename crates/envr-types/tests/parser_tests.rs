use envr_types::{Element, Error, Path, TypeDescriptor};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("/", "/")]
#[case("/a/b:int", "/a/b:int")]
#[case("a:string", "a:string")]
#[case(":any", ":any")]
#[case("/a:?", "/a:any")]
#[case("/db(int=3):string", "/db(int=\"3\"):string")]
#[case("/a\\/b:int", "/a\\/b:int")]
#[case("/f(map<string,int>,int):long", "/f(map<string,int>,int):long")]
#[case("/f():int", "/f():int")]
#[case("/ a:int", "/ a:int")]
#[case("/x(string=\"a/b)c\"):int", "/x(string=\"a\\/b\\)c\"):int")]
#[case("/list:list<string>[]", "/list:list<string>[]")]
fn test_parse_prints_canonical_form(#[case] input: &str, #[case] expected: &str) {
    let path = Path::parse(input).unwrap();
    assert_eq!(path.to_string(), expected);
    assert_eq!(Path::parse(expected).unwrap(), path);
}

#[rstest]
#[case("", 0)]
#[case("/a//b:int", 3)]
#[case("/a/b(int=1:int", 4)]
#[case("/a)b:int", 2)]
#[case("/a:int\\", 6)]
#[case("/a(int=\"x\"y):int", 10)]
#[case("/a(int)b:int", 7)]
#[case("/a(int=1,int):int", 12)]
#[case("/a:int/b", 8)]
#[case("/a/:void", 3)]
#[case("/a:map<string", 13)]
fn test_malformed_input_names_column(#[case] input: &str, #[case] expected: usize) {
    match Path::parse(input) {
        Err(Error::Parse { column, input: reported, .. }) => {
            assert_eq!(column, expected, "{input}");
            assert_eq!(reported, input);
        }
        other => panic!("expected a parse error for {input:?}, got {other:?}"),
    }
}

#[test]
fn test_escaped_slash_does_not_split() {
    let path = Path::parse("/a\\/b:int").unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(path.last().name(), "a/b");
}

#[test]
fn test_quotes_are_removed_from_arguments() {
    let path = Path::parse("/db(int=\"3\",string=\"main\")/url:string").unwrap();
    let db = path.get(1).unwrap();
    assert_eq!(db.arguments(), Some(&["3".to_string(), "main".to_string()][..]));
    assert_eq!(db.ty(), None);
}

#[test]
fn test_parse_element() {
    let element: Element = "port:int".parse().unwrap();
    assert_eq!(element.name(), "port");
    assert_eq!(element.ty(), Some(&TypeDescriptor::int()));
    assert!("".parse::<Element>().unwrap().is_root());
}

#[test]
fn test_path_serde_uses_text_form() {
    let path = Path::parse("/db(int=3)/port:int").unwrap();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, "\"/db(int=\\\"3\\\")/port:int\"");
    let back: Path = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);
}
