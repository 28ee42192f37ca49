/// Collapse every internal whitespace run (spaces, tabs, line endings) to a
/// single space, trimming the ends. Used for code span bodies.
pub fn normalize_whitespace(v: &str) -> String {
    let mut last_char_was_space = true;
    let mut r = String::with_capacity(v.len());

    for c in v.chars() {
        if c.is_ascii_whitespace() {
            if !last_char_was_space {
                r.push(' ');
                last_char_was_space = true;
            }
        } else {
            r.push(c);
            last_char_was_space = false;
        }
    }

    while r.ends_with(' ') {
        r.pop();
    }

    r
}

/// Trim surrounding whitespace in place.
pub fn trim(line: &mut String) {
    let end = line.trim_end().len();
    line.truncate(end);
    let start = line.len() - line.trim_start().len();
    line.drain(..start);
}

pub fn trim_slice(i: &str) -> &str {
    i.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// Whether an autolink interior looks like a bare email address.
pub fn is_email(url: &str) -> bool {
    let at = match url.find('@') {
        Some(i) if i > 0 => i,
        _ => return false,
    };
    let (local, host) = (&url[..at], &url[at + 1..]);
    if host.is_empty() || !host.contains('.') {
        return false;
    }
    local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b))
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}

/// Whether an autolink interior is URL-shaped: a scheme followed by `:`,
/// or an email address.
pub fn is_url_shaped(url: &str) -> bool {
    if url.is_empty() || url.bytes().any(|b| b.is_ascii_whitespace()) {
        return false;
    }
    if is_email(url) {
        return true;
    }
    match url.find(':') {
        Some(i) if i > 0 => url[..i].bytes().enumerate().all(|(n, b)| {
            b.is_ascii_alphabetic() || (n > 0 && (b.is_ascii_digit() || b == b'+' || b == b'-' || b == b'.'))
        }),
        _ => false,
    }
}

/// Clean an autolink interior: trim and prefix `mailto:` for bare email
/// addresses.
pub fn clean_autolink(url: &str) -> String {
    let url = trim_slice(url);
    if is_email(url) {
        format!("mailto:{}", url)
    } else {
        url.to_string()
    }
}

/// Sanitize a URL for in-band emission inside an OSC 8 escape: control
/// bytes below 0x20 (except CR) would terminate or corrupt the sequence,
/// so they are percent-encoded.
pub fn sanitize_hyperlink(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if (c as u32) < 0x20 && c != '\r' {
            out.push_str(&format!("%{:02X}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}
