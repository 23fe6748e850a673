/// Splits `name` at its last `.` into stem and extension (extension keeps the dot).
///
/// A leading dot does not start an extension, and neither does a trailing one:
/// `".png"` → (`".png"`, None), `"a."` → (`"a."`, None), `"a.b.png"` → (`"a.b"`, Some(`".png"`)).
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() => (&name[..i], Some(&name[i..])),
        _ => (name, None),
    }
}
