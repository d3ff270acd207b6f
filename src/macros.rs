/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Keys must be string literals. Leaves go through `Value::from`, so any
/// type with a `From` conversion works; wrap longer expressions (or negative
/// numbers) in parentheses. There is no `null`.
///
/// ```rust
/// use tomlutil::{toml_value, Value};
///
/// let value = toml_value!({
///     "name": "Alice",
///     "ports": [80, 443],
///     "offset": (-7)
/// });
/// assert_eq!(value.get("offset"), Some(&Value::Integer(-7)));
/// ```
#[macro_export]
macro_rules! toml_value {
    (true) => {
        $crate::Value::Boolean(true)
    };

    (false) => {
        $crate::Value::Boolean(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toml_value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert($key.to_string(), $crate::toml_value!($value));
        )*
        $crate::Value::Map(map)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{DateTime, Map, Value};

    #[test]
    fn test_toml_value_scalars() {
        assert_eq!(toml_value!(true), Value::Boolean(true));
        assert_eq!(toml_value!(42), Value::Integer(42));
        assert_eq!(toml_value!(3.5), Value::Float(3.5));
        assert_eq!(toml_value!("hello"), Value::String("hello".to_string()));
        assert_eq!(
            toml_value!((DateTime::local_date(2024, 1, 1))),
            Value::DateTime(DateTime::local_date(2024, 1, 1))
        );
    }

    #[test]
    fn test_toml_value_nested() {
        assert_eq!(toml_value!({}), Value::Map(Map::new()));

        let value = toml_value!({
            "server": { "host": "localhost", "ports": [80, 443] },
            "debug": false
        });
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["server", "debug"]);
        assert_eq!(
            value.get("server").and_then(|s| s.get("ports")),
            Some(&Value::Array(vec![Value::Integer(80), Value::Integer(443)]))
        );
    }
}
