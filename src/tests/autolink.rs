use super::*;
use pretty_assertions::assert_eq;

#[test]
fn uri_autolink() {
    html(
        "<https://example.com/a?b=c>\n",
        "<p><a href=\"https://example.com/a?b=c\">https://example.com/a?b=c</a></p>\n",
    );
}

#[test]
fn email_autolink_gets_mailto() {
    html(
        "<someone@example.com>\n",
        "<p><a href=\"mailto:someone@example.com\">someone@example.com</a></p>\n",
    );
}

#[test]
fn non_url_interior_is_literal() {
    html("<not a url>\n", "<p>&lt;not a url&gt;</p>\n");
}

#[test]
fn unterminated_is_literal() {
    html("<https://x\nrest\n", "<p>&lt;https://x rest</p>\n");
}

#[test]
fn console_emits_osc8_frames() {
    let raw = console("<https://example.com>\n", 80);
    assert!(raw.contains("\x1b]8;;https://example.com\x1b\\"));
    assert!(raw.contains("\x1b]8;;\x1b\\"));
    assert!(strip_ansi(&raw).contains("https://example.com"));
}

#[test]
fn hyperlink_targets_carry_no_raw_control_bytes() {
    // A control byte smuggled into a URL is percent-encoded before it
    // reaches the escape sequence.
    let raw = console("[x](http://e\u{1}vil)\n", 80);
    let open = raw.find("\x1b]8;;").unwrap();
    let close = raw[open + 5..].find("\x1b\\").unwrap() + open + 5;
    let target = &raw[open + 5..close];
    assert!(target.bytes().all(|b| b >= 0x20 || b == b'\r'));
    assert!(target.contains("%01"));
}

#[test]
fn link_text_is_cyan() {
    let raw = console("[x](http://y)\n", 80);
    assert!(raw.contains("\x1b[36m"));
}
