//! Distinguished name helpers (RFC 4514)

/// Escape special characters in a DN attribute value per RFC 4514.
///
/// Characters that must be escaped:
/// - Leading or trailing SPACE (escaped as \20)
/// - Leading # (escaped as \23)
/// - Characters: , + " \ < > ; = (escaped with backslash prefix)
/// - NUL character (escaped as \00)
pub fn escape_dn_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len() * 2);
    let last = value.chars().count().saturating_sub(1);

    for (i, ch) in value.chars().enumerate() {
        match ch {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=' => {
                result.push('\\');
                result.push(ch);
            }
            '\0' => result.push_str("\\00"),
            ' ' if i == 0 || i == last => result.push_str("\\20"),
            '#' if i == 0 => result.push_str("\\23"),
            _ => result.push(ch),
        }
    }

    result
}

/// Reverse [`escape_dn_value`], including `\XX` hex escapes.
pub fn unescape_dn_value(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            let hex_pair = bytes
                .get(i + 1..i + 3)
                .filter(|pair| pair.iter().all(u8::is_ascii_hexdigit))
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok());
            match hex_pair {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(bytes[i + 1]);
                    i += 2;
                }
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Split a DN into its first RDN and the parent DN, at the first comma that
/// is not escaped.
pub fn split_first_rdn(dn: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, ch) in dn.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            ',' if !escaped => return (dn[..idx].trim(), dn[idx + 1..].trim()),
            _ => escaped = false,
        }
    }
    (dn.trim(), "")
}

/// Unescaped value of the first RDN (`CN=Tes Tuser,OU=...` gives `Tes Tuser`).
pub fn first_rdn_value(dn: &str) -> String {
    let (rdn, _) = split_first_rdn(dn);
    let value = rdn.split_once('=').map_or(rdn, |(_, v)| v);
    unescape_dn_value(value.trim())
}

/// Build `attr=value,parent`, escaping the value.
pub fn compose_dn(attribute: &str, value: &str, parent: &str) -> String {
    let rdn = format!("{}={}", attribute, escape_dn_value(value));
    if parent.trim().is_empty() {
        rdn
    } else {
        format!("{},{}", rdn, parent.trim())
    }
}
