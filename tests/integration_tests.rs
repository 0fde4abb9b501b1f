use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use yocton::{from_slice, from_str, load, loads, to_fields, to_string, Fields, Value};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    note: Option<String>,
}

fn assert_roundtrip<T>(original: &T)
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
{
    let text = to_string(original).unwrap();
    let deserialized: T = from_str(&text).unwrap();
    assert_eq!(*original, deserialized);
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let text = to_string(&user).unwrap();
    assert_eq!(
        text,
        "id: 123\nname: Alice\nactive: true\ntags: admin\ntags: developer\n"
    );
    assert_roundtrip(&user);
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
        note: None,
    };

    let text = to_string(&order).unwrap();
    assert!(text.contains("items {\n\tsku: WIDGET-001\n"));
    assert!(!text.contains("note"));

    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_empty_collections() {
    let user = User {
        id: 1,
        name: String::new(),
        active: false,
        tags: vec![],
    };
    let text = to_string(&user).unwrap();
    assert_eq!(text, "id: 1\nname: \"\"\nactive: false\n");

    // A sequence field that never appears needs #[serde(default)].
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Tagged {
        #[serde(default)]
        tags: Vec<String>,
    }
    assert_roundtrip(&Tagged { tags: vec![] });

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Empty {}
    assert_roundtrip(&Empty {});
}

#[test]
fn test_special_strings() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Wrapper {
        s: String,
    }

    let special_strings = [
        "",
        "hello, world",
        "line1\nline2",
        "tab\there",
        "carriage\rreturn",
        " leading space",
        "trailing space ",
        "{braces}",
        "colon: here",
        "\"quoted\"",
        "back\\slash",
        "bell\x07",
        "ünïcödé",
        "-12.5e+3",
    ];

    for s in special_strings {
        assert_roundtrip(&Wrapper { s: s.to_string() });
    }
}

#[test]
fn test_numbers() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Numbers {
        a: i8,
        b: i16,
        c: i32,
        d: i64,
        e: u8,
        f: u16,
        g: u32,
        h: u64,
        i: f32,
        j: f64,
        k: i128,
    }

    assert_roundtrip(&Numbers {
        a: -128,
        b: 32767,
        c: -2147483648,
        d: 9223372036854775807,
        e: 255,
        f: 65535,
        g: 4294967295,
        h: u64::MAX,
        i: -2.5,
        j: 4.25,
        k: i128::MIN,
    });
}

#[test]
fn test_enums() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u32, h: u32 },
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Drawing {
        shapes: Vec<Shape>,
        background: Shape,
    }

    let drawing = Drawing {
        shapes: vec![Shape::Circle(1.5), Shape::Empty, Shape::Rect { w: 2, h: 3 }],
        background: Shape::Empty,
    };
    let text = to_string(&drawing).unwrap();
    assert_eq!(
        text,
        "shapes {\n\tCircle: 1.5\n}\nshapes: Empty\nshapes {\n\tRect {\n\t\tw: 2\n\t\th: 3\n\t}\n}\nbackground: Empty\n"
    );
    assert_roundtrip(&drawing);
}

#[test]
fn test_newtype_variant_holding_sequence() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Payload {
        One(u32),
        Many(Vec<u32>),
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Holder {
        p: Payload,
    }

    let holder = Holder {
        p: Payload::Many(vec![1, 2]),
    };
    let text = to_string(&holder).unwrap();
    assert_eq!(text, "p {\n\tMany: 1\n\tMany: 2\n}\n");
    assert_roundtrip(&holder);
    assert_roundtrip(&Holder {
        p: Payload::Many(vec![7]),
    });
    assert_roundtrip(&Holder { p: Payload::One(3) });
}

#[test]
fn test_maps() {
    let mut map = BTreeMap::new();
    map.insert("alpha".to_string(), 1);
    map.insert("beta gamma".to_string(), 2);
    assert_roundtrip(&map);

    let grouped: HashMap<String, Vec<String>> = from_str("x: 1\ny: 2\nx: 3\n").unwrap();
    assert_eq!(grouped["x"], ["1", "3"]);
}

#[test]
fn test_options_and_defaults() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Settings {
        name: String,
        #[serde(default)]
        retries: u8,
        timeout: Option<u32>,
    }

    let settings: Settings = from_str("name: svc\ntimeout: 30\n").unwrap();
    assert_eq!(
        settings,
        Settings {
            name: "svc".to_string(),
            retries: 0,
            timeout: Some(30),
        }
    );

    let err = from_str::<Settings>("timeout: 30\n").unwrap_err();
    assert_eq!(err.to_string(), "missing field `name`");
}

#[test]
fn test_unknown_fields_are_ignored() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Small {
        keep: u8,
    }

    let small: Small = from_str("extra { deep { x: 1 } }\nkeep: 7\nother: y\n").unwrap();
    assert_eq!(small, Small { keep: 7 });
}

#[test]
fn test_deeply_nested_document() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Small {
        keep: u8,
    }

    let depth = 50_000;
    let mut text = "keep: 1\n".to_string();
    text.push_str(&"a {\n".repeat(depth));
    text.push_str(&"}\n".repeat(depth));

    let small: Small = from_str(&text).unwrap();
    assert_eq!(small, Small { keep: 1 });

    let fields = loads(&text).unwrap();
    assert_eq!(fields.len(), 2);
}

#[test]
fn test_syntax_errors_surface() {
    let err = from_str::<BTreeMap<String, String>>("a: 1\nb {\n").unwrap_err();
    assert_eq!(err.to_string(), "3: unexpected EOF");
    assert_eq!(err.line(), Some(3));

    let err = from_slice::<BTreeMap<String, String>>(b"a: \"\\q\"\n").unwrap_err();
    assert_eq!(err.message(), "unknown string escape: \\q");
}

#[test]
fn test_fields_round_trip_preserves_order_and_repeats() {
    let text = "b: 1\na {\n\tx: y\n}\nb: 2\n";
    let fields = loads(text).unwrap();
    assert_eq!(fields.names().collect::<Vec<_>>(), ["b", "a", "b"]);
    assert_eq!(fields.to_string(), text);

    let from_reader = load(std::io::Cursor::new(text)).unwrap();
    assert_eq!(from_reader, fields);
}

#[test]
fn test_to_fields() {
    let user = User {
        id: 7,
        name: "Bo".to_string(),
        active: false,
        tags: vec!["a".to_string(), "b".to_string()],
    };
    let fields = to_fields(&user).unwrap();
    assert_eq!(fields.get_str("id"), Some("7"));
    assert_eq!(fields.get_all("tags").count(), 2);

    let value: Value = yocton::from_fields(fields.clone()).unwrap();
    assert_eq!(value, Value::Object(fields));
}

#[test]
fn test_fields_to_and_from_json() {
    let fields: Fields = yocton::yocton!({
        "name": "demo",
        "tag": "a",
        "tag": "b",
        "inner": { "k": "v" },
    });

    let json = serde_json::to_value(&fields).unwrap();
    // JSON objects cannot hold repeated keys; the last one wins there.
    assert_eq!(
        json,
        serde_json::json!({ "name": "demo", "tag": "b", "inner": { "k": "v" } })
    );

    let back: Fields =
        serde_json::from_str(r#"{"name": "demo", "tag": ["a", "b"], "inner": {"k": "v"}}"#)
            .unwrap();
    assert_eq!(back, fields);
}

#[test]
fn test_top_level_must_be_struct_or_map() {
    let err = to_string(&vec![1, 2, 3]).unwrap_err();
    assert_eq!(err.to_string(), "top-level value must be a struct or map");
    let err = to_string(&"text").unwrap_err();
    assert_eq!(err.to_string(), "top-level value must be a struct or map");
}
