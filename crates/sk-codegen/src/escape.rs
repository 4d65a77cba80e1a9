//! Text escaping and name mangling for generated output.

use sk_core::NodeId;

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text placed between JSX tags. Braces would otherwise open an
/// expression.
pub fn escape_jsx(text: &str) -> String {
    escape_html(text)
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

/// `backgroundColor` → `background-color`, `WebkitTransform` →
/// `-webkit-transform`. Keys that are already kebab-case pass through.
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        // A leading capital is a vendor prefix and gets a leading dash too.
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// The per-element class: `element-<id>`. Ids holding `_` or characters
/// that are not valid in a CSS identifier have those replaced by `_` and
/// get a hash of the raw id appended, so distinct ids keep distinct
/// classes. Ids made of letters, digits and `-` pass through unchanged.
pub fn class_name(id: NodeId) -> String {
    let raw = id.as_str();
    let clean = |c: char| c.is_ascii_alphanumeric() || c == '-';
    if raw.chars().all(clean) {
        return format!("element-{raw}");
    }
    let safe: String = raw.chars().map(|c| if clean(c) { c } else { '_' }).collect();
    format!("element-{safe}-{:08x}", fnv1a(raw))
}

/// 32-bit FNV-1a. Stable across builds and platforms.
fn fnv1a(text: &str) -> u32 {
    text.bytes().fold(0x811c_9dc5, |hash: u32, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

/// Component identifier from a project name: non-alphanumerics are
/// stripped and the first letter is capitalized. Empty names fall back
/// to `WebsiteComponent`; names starting with a digit get a `Component`
/// prefix so the result is a valid identifier.
pub fn sanitize_component_name(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let mut chars = stripped.chars();
    match chars.next() {
        None => "WebsiteComponent".to_string(),
        Some(first) if first.is_ascii_digit() => format!("Component{stripped}"),
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
    }
}
