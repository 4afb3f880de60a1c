//! Hex color channel shifting.

/// Shift every channel of a `#rrggbb` color by `offset`, clamping each
/// channel to `00..=ff`.
///
/// The input is not validated. Channels are parsed leniently (leading
/// whitespace, sign and `0x` prefix are accepted, trailing garbage is
/// ignored); a channel with no hex digits at all clamps to `ff`.
///
/// ```
/// assert_eq!(livetiles::color::adjust_hex_color("#336699", -100), "#000235");
/// assert_eq!(livetiles::color::adjust_hex_color("#f0f0f0", 100), "#ffffff");
/// ```
pub fn adjust_hex_color(hex: &str, offset: i32) -> String {
    let stripped = hex.replacen('#', "", 1);
    let chars: Vec<char> = stripped.chars().collect();
    let channels: Vec<String> = chars
        .chunks_exact(2)
        .map(|pair| pair.iter().collect())
        .collect();

    let mut out = String::with_capacity(7);
    out.push('#');
    for i in 0..3 {
        let value = channels
            .get(i)
            .and_then(|c| parse_hex_prefix(c))
            .map(|v| v + i64::from(offset));
        out.push_str(&clamp_channel(value));
    }
    out
}

/// Encode one shifted channel. `None` stands for a channel that did not parse.
fn clamp_channel(value: Option<i64>) -> String {
    match value {
        // unparseable channels encode to three characters and clamp high
        None => "ff".to_string(),
        Some(v) if v <= 0 => "00".to_string(),
        Some(v) => {
            let encoded = format!("{:x}", v);
            match encoded.len() {
                1 => format!("0{}", encoded),
                2 => encoded,
                _ => "ff".to_string(),
            }
        }
    }
}

fn parse_hex_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let rest = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);

    let digits: String = rest.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    if digits.is_empty() {
        return None;
    }
    let value = i64::from_str_radix(&digits, 16).ok()?;
    Some(if negative { -value } else { value })
}
