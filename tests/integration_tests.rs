use serde::{Deserialize, Serialize};
use tomlutil::{
    from_reader, from_str, from_str_with_options, from_value, to_string, to_string_pretty,
    to_value, DateTime, DateTimeKind, ErrorKind, FaultPolicy, Map, Options, Value,
};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    name: String,
    sku: i64,
    color: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Owner {
    name: String,
    dob: DateTime,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Inventory {
    title: String,
    owner: Owner,
    products: Vec<Product>,
}

const EXAMPLE: &str = r#"
# This is a TOML document.

title = "TOML Example"

[owner]
name = "Tom Preston-Werner"
dob = 1979-05-27T07:32:00-08:00

[database]
enabled = true
ports = [ 8000, 8001, 8002 ]
data = [ ["delta", "phi"], [3.14] ]
temp_targets = { cpu = 79.5, case = 72.0 }

[servers]

[servers.alpha]
ip = "10.0.0.1"
role = "frontend"

[servers.beta]
ip = "10.0.0.2"
role = "backend"
"#;

fn keys(map: &Map) -> Vec<&str> {
    map.keys().map(String::as_str).collect()
}

fn table<'a>(value: Option<&'a Value>) -> &'a Map {
    value.and_then(Value::as_map).expect("expected a table")
}

#[test]
fn test_example_document_shape() {
    let map = from_str(EXAMPLE).unwrap();
    assert_eq!(keys(&map), vec!["title", "owner", "database", "servers"]);

    let database = table(map.get("database"));
    assert_eq!(
        keys(database),
        vec!["enabled", "ports", "data", "temp_targets"]
    );
    assert_eq!(
        database.get("data"),
        Some(&Value::Array(vec![
            Value::Array(vec![Value::from("delta"), Value::from("phi")]),
            Value::Array(vec![Value::Float(3.14)]),
        ]))
    );
    assert_eq!(
        table(database.get("temp_targets")).get("case"),
        Some(&Value::Float(72.0))
    );

    let servers = table(map.get("servers"));
    assert_eq!(keys(servers), vec!["alpha", "beta"]);
    assert_eq!(
        table(servers.get("beta")).get("role"),
        Some(&Value::from("backend"))
    );
}

#[test]
fn test_sibling_tables_stay_separate() {
    let map = from_str("[a]\nx = 1\n\n[b]\ny = 2").unwrap();
    assert_eq!(keys(&map), vec!["a", "b"]);
    assert_eq!(keys(table(map.get("a"))), vec!["x"]);
    assert_eq!(keys(table(map.get("b"))), vec!["y"]);
}

#[test]
fn test_table_array_becomes_sequence_of_maps() {
    let map = from_str("[[arr]]\nx = 1\n\n[[arr]]\nx = 2").unwrap();
    let arr = map.get("arr").and_then(Value::as_array).unwrap();
    assert_eq!(arr.len(), 2);
    assert!(arr.iter().all(Value::is_map));
    assert_eq!(arr[0].get("x"), Some(&Value::Integer(1)));
    assert_eq!(arr[1].get("x"), Some(&Value::Integer(2)));
}

#[test]
fn test_deep_nesting() {
    let map = from_str("[a.b.c]\nv = 1").unwrap();
    let c = table(table(table(map.get("a")).get("b")).get("c"));
    assert_eq!(keys(c), vec!["v"]);
    assert_eq!(c.get("v"), Some(&Value::Integer(1)));
}

#[test]
fn test_tables_after_table_arrays_resume_correctly() {
    let input = r#"
[[fruits]]
name = "apple"

[fruits.physical]
color = "red"

[[fruits.varieties]]
name = "red delicious"

[[fruits.varieties]]
name = "granny smith"

[[fruits]]
name = "banana"

[vegetables]
count = 3
"#;
    let map = from_str(input).unwrap();
    assert_eq!(keys(&map), vec!["fruits", "vegetables"]);

    let fruits = map.get("fruits").and_then(Value::as_array).unwrap();
    assert_eq!(fruits.len(), 2);
    let apple = fruits[0].as_map().unwrap();
    assert_eq!(keys(apple), vec!["name", "physical", "varieties"]);
    assert_eq!(
        apple
            .get("varieties")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(2)
    );
    assert_eq!(keys(fruits[1].as_map().unwrap()), vec!["name"]);
    assert_eq!(
        table(map.get("vegetables")).get("count"),
        Some(&Value::Integer(3))
    );
}

#[test]
fn test_all_date_time_flavors() {
    let map = from_str(
        "odt = 1979-05-27T00:32:00.999999-07:00\n\
         ldt = 1979-05-27T07:32:00\n\
         ld = 1979-05-27\n\
         lt = 00:32:00.999999",
    )
    .unwrap();
    let get = |k: &str| *map.get(k).and_then(Value::as_datetime).unwrap();

    let odt = get("odt");
    assert_eq!(odt.kind, DateTimeKind::OffsetDateTime);
    assert_eq!(odt.offset, Some(-420));
    assert_eq!(odt.nanosecond, 999_999_000);

    assert_eq!(get("ldt").offset, None);
    assert_eq!(get("ld"), DateTime::local_date(1979, 5, 27));
    assert_eq!(get("lt"), DateTime::local_time(0, 32, 0, 999_999_000));
}

#[test]
fn test_struct_round_trip() {
    let inventory = Inventory {
        title: "Hardware".to_string(),
        owner: Owner {
            name: "Tom".to_string(),
            dob: "1979-05-27T07:32:00-08:00".parse().unwrap(),
        },
        products: vec![
            Product {
                name: "Hammer".to_string(),
                sku: 738594937,
                color: None,
            },
            Product {
                name: "Nail".to_string(),
                sku: 284758393,
                color: Some("gray".to_string()),
            },
        ],
    };

    let text = to_string(&inventory).unwrap();
    assert!(text.contains("[[products]]"));
    assert!(text.contains("dob = 1979-05-27T07:32:00-08:00"));

    let back: Inventory = from_value(Value::Map(from_str(&text).unwrap())).unwrap();
    assert_eq!(back, inventory);
}

#[test]
fn test_pretty_round_trip() {
    let value = to_value(&Product {
        name: "x".to_string(),
        sku: 1,
        color: None,
    })
    .unwrap();
    let mut map = value.as_map().cloned().unwrap();
    map.insert(
        "nested".to_string(),
        Value::Array(vec![
            Value::Array(vec![Value::Integer(1), Value::Integer(2)]),
            Value::Array(vec![]),
        ]),
    );

    let text = to_string_pretty(&map).unwrap();
    assert_eq!(from_str(&text).unwrap(), map);
}

#[test]
fn test_strict_options_accept_valid_documents() {
    let options = Options::strict();
    assert_eq!(options.fault_policy, FaultPolicy::Strict);
    let map = from_str_with_options(EXAMPLE, &options).unwrap();
    assert_eq!(map, from_str(EXAMPLE).unwrap());
}

#[test]
fn test_parse_errors() {
    for input in ["a = ", "[table", "a = 1\na = 2", "x = 1979-13-01"] {
        let err = from_str(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse, "input: {input:?}");
        assert_eq!(err.code(), ErrorKind::Parse.code());
    }
}

#[test]
fn test_from_reader() {
    let map = from_reader(std::io::Cursor::new(EXAMPLE.as_bytes())).unwrap();
    assert_eq!(map.len(), 4);
}

#[test]
fn test_encode_errors() {
    let mut map = Map::new();
    map.insert(
        "bad".to_string(),
        Value::DateTime(DateTime::local_date(2024, 2, 32)),
    );
    assert_eq!(to_string(&map).unwrap_err().kind(), ErrorKind::Encode);

    for bad in [
        DateTime::local_date(2023, 2, 29),
        DateTime::local_date(2023, 2, 30),
        DateTime::local_date(10000, 1, 1),
    ] {
        let mut map = Map::new();
        map.insert("when".to_string(), Value::DateTime(bad));
        assert_eq!(to_string(&map).unwrap_err().kind(), ErrorKind::Encode);
    }

    let mut leap = Map::new();
    leap.insert(
        "when".to_string(),
        Value::DateTime(DateTime::local_date(2024, 2, 29)),
    );
    assert_eq!(from_str(&to_string(&leap).unwrap()).unwrap(), leap);

    #[derive(Serialize)]
    struct Big {
        n: u64,
    }
    assert_eq!(
        to_string(&Big { n: u64::MAX }).unwrap_err().kind(),
        ErrorKind::Encode
    );
}
