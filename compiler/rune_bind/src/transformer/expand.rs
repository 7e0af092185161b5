//! `$name` interpolation in generated identifiers and strings.
//!
//! A fragment starts after `$` and runs over letters and digits. A `_`
//! ends it and is dropped; any other character ends it and is kept. The
//! fragment names a generator variable whose value is spliced in:
//!
//! - at the start of the text the value's first letter is lower-cased,
//!   elsewhere it is capitalized, so `first$child` with `child = Node`
//!   gives `firstNode` and `$child_count` gives `nodecount`
//! - the fragment `L` splices nothing and capitalizes the next value,
//!   so `$L$child` gives `Node`

/// Expand every fragment of `text`. Returns `Ok(None)` if `text` has no
/// `$`, and the unknown fragment name as the error.
pub(crate) fn expand_text(
    text: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, String> {
    if !text.contains('$') {
        return Ok(None);
    }
    let mut out = String::with_capacity(text.len());
    let mut upper_next = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut fragment = String::new();
        while let Some(next) = chars.next_if(|ch| ch.is_ascii_alphanumeric()) {
            fragment.push(next);
        }
        chars.next_if_eq(&'_');
        if fragment == "L" {
            upper_next = true;
            continue;
        }
        let Some(value) = lookup(&fragment) else {
            return Err(fragment);
        };
        let capitalize = upper_next || !out.is_empty();
        upper_next = false;
        let mut value_chars = value.chars();
        if let Some(first) = value_chars.next() {
            if capitalize {
                out.extend(first.to_uppercase());
            } else {
                out.extend(first.to_lowercase());
            }
            out.push_str(value_chars.as_str());
        }
    }
    Ok(Some(out))
}
