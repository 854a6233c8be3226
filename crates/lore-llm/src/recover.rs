//! Lenient JSON recovery for model output.
//!
//! Providers asked for strict JSON still wrap the payload in prose often
//! enough that direct parsing cannot be the only path. The fallback scans
//! for the first balanced top-level `{...}` substring. The scanner is
//! string-aware: braces inside JSON string literals (and escaped quotes
//! inside those strings) do not affect the depth count.

use serde_json::Value;

/// Parse `raw` as a JSON object, directly or by extracting the first
/// balanced object substring. Returns `None` when neither succeeds.
pub fn parse_json_lenient(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Some(value);
        }
    }

    let candidate = first_balanced_object(trimmed)?;
    serde_json::from_str::<Value>(candidate).ok()
}

/// The first balanced `{...}` substring of `input`, or `None`.
fn first_balanced_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in input[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
