/// Builds a [`Fields`](crate::Fields) document from a JSON-like literal.
///
/// Values in braces become nested objects; anything else is converted with
/// `Value::from`. Repeat a name to get repeated properties.
///
/// ```rust
/// use yocton::yocton;
///
/// let doc = yocton!({
///     "name": "widget",
///     "count": 3,
///     "tag": "a",
///     "tag": "b",
///     "size": { "w": 2, "h": -1 },
/// });
///
/// assert_eq!(doc.get_str("count"), Some("3"));
/// assert_eq!(doc.get_all("tag").count(), 2);
/// assert_eq!(
///     doc.to_string(),
///     "name: widget\ncount: 3\ntag: a\ntag: b\nsize {\n\tw: 2\n\th: -1\n}\n"
/// );
/// ```
#[macro_export]
macro_rules! yocton {
    (@fields $fields:ident;) => {};

    // Nested object
    (@fields $fields:ident; $name:literal : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $fields.push($name, $crate::Value::Object($crate::yocton!({ $($inner)* })));
        $crate::yocton!(@fields $fields; $($($rest)*)?);
    };

    // Anything convertible into a value
    (@fields $fields:ident; $name:literal : $value:expr $(, $($rest:tt)*)?) => {
        $fields.push($name, $crate::Value::from($value));
        $crate::yocton!(@fields $fields; $($($rest)*)?);
    };

    ({ $($body:tt)* }) => {{
        #[allow(unused_mut)]
        let mut fields = $crate::Fields::new();
        $crate::yocton!(@fields fields; $($body)*);
        fields
    }};
}
