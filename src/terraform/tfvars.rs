use indexmap::IndexMap;

/// Renders the variable assignment file: one `key = "value"` line per entry,
/// in the order the map was provided. Values are written verbatim between
/// double quotes; embedded quotes are not escaped, so a value containing `"`
/// produces a file terraform will reject.
pub fn render(variables: &IndexMap<String, String>) -> String {
    variables
        .iter()
        .map(|(key, value)| format!("{} = \"{}\"", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}
