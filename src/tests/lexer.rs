use super::*;
use pretty_assertions::assert_eq;
use crate::lexer::{lex, SourcePos, TokenKind};

#[test]
fn tokens_cover_the_entire_input() {
    let inputs = [
        "# Hello, world!\n",
        "- [x] task\n",
        "```zig\nconst x = 1;\n```\n",
        "plain *emph* **bold** ***both***\n",
        "tab\tstop — ünïcode 123\n",
    ];
    for input in inputs {
        let tokens = lex(input);
        let rebuilt: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, input);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
            1
        );
    }
}

#[test]
fn positions_are_monotonic() {
    let tokens = lex("a b\ncd\te\n\nf\n");
    let mut prev = SourcePos::default();
    for t in &tokens {
        assert!(
            t.pos.row > prev.row || (t.pos.row == prev.row && t.pos.col >= prev.col),
            "position went backwards at {:?}",
            t
        );
        prev = t.pos;
    }
}

#[test]
fn words_and_digits_split() {
    let kinds: Vec<TokenKind> = lex("ab12cd").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Word,
            TokenKind::Digits,
            TokenKind::Word,
            TokenKind::Eof
        ]
    );
}

#[test]
fn multibyte_runs_aggregate_into_one_word() {
    let tokens = lex("日本語abc");
    assert_eq!(tokens[0].kind, TokenKind::Word);
    assert_eq!(tokens[0].text, "日本語");
    assert_eq!(tokens[1].text, "abc");
    // Columns advance by code points, not bytes.
    assert_eq!(tokens[1].pos, SourcePos { row: 0, col: 3 });
}

#[test]
fn emphasis_literals() {
    let kinds = |s: &str| lex(s).first().map(|t| t.kind).unwrap();
    assert_eq!(kinds("***"), TokenKind::Embold);
    assert_eq!(kinds("**_"), TokenKind::Embold);
    assert_eq!(kinds("_**"), TokenKind::Embold);
    assert_eq!(kinds("___"), TokenKind::Embold);
    assert_eq!(kinds("**"), TokenKind::Bold);
    assert_eq!(kinds("__"), TokenKind::Bold);
    assert_eq!(kinds("*"), TokenKind::Star);
    assert_eq!(kinds("_"), TokenKind::Underscore);
}

#[test]
fn directive_preserves_run_length() {
    let tokens = lex("`````\n");
    assert_eq!(tokens[0].kind, TokenKind::Directive);
    assert_eq!(tokens[0].text, "`````");

    let tokens = lex("``x");
    // Two back-ticks are two CODE_INLINE tokens, not a directive.
    assert_eq!(tokens[0].kind, TokenKind::CodeInline);
    assert_eq!(tokens[1].kind, TokenKind::CodeInline);
}

#[test]
fn tabs_count_as_two_columns() {
    let tokens = lex("\ta");
    assert_eq!(tokens[0].kind, TokenKind::Indent);
    assert_eq!(tokens[1].pos, SourcePos { row: 0, col: 2 });
}

#[test]
fn crlf_is_one_break() {
    let tokens = lex("a\r\nb");
    assert_eq!(tokens[1].kind, TokenKind::Break);
    assert_eq!(tokens[1].text, "\r\n");
    assert_eq!(tokens[2].pos, SourcePos { row: 1, col: 0 });
}

#[test]
fn break_resets_column() {
    let tokens = lex("abc\nd");
    assert_eq!(tokens[2].pos, SourcePos { row: 1, col: 0 });
}

#[test]
fn control_bytes_are_unknown() {
    let tokens = lex("\u{1}");
    assert_eq!(tokens[0].kind, TokenKind::Unknown);
}
