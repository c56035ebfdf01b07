use similar_asserts::assert_eq;

use mailmerge::machinery::{tokenize, Token, TokenKind, Tokenizer};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).map(|(tok, _)| tok.kind()).collect()
}

#[test]
fn test_interpolation() {
    assert_eq!(
        kinds("a{{b}}"),
        vec![
            TokenKind::Character,
            TokenKind::Start,
            TokenKind::Character,
            TokenKind::End,
        ]
    );
}

#[test]
fn test_markdown_interpolation() {
    let tokens: Vec<_> = tokenize("{{{ c }}}").map(|(tok, _)| tok).collect();
    assert_eq!(
        tokens,
        vec![
            Token::StartMd,
            Token::Character(" "),
            Token::Character("c"),
            Token::Character(" "),
            Token::EndMd,
        ]
    );
}

#[test]
fn test_single_braces_are_characters() {
    let tokens: Vec<_> = tokenize("{a}").map(|(tok, _)| tok).collect();
    assert_eq!(
        tokens,
        vec![
            Token::Character("{"),
            Token::Character("a"),
            Token::Character("}"),
        ]
    );
    assert_eq!(tokens[1].literal(), Some("a"));
    assert_eq!(Token::Start.literal(), None);
}

#[test]
fn test_source_roundtrip() {
    let source = "Dear {{ name }},\n{{{ body }}} {x} }}} done";
    let rebuilt: String = tokenize(source).map(|(tok, _)| tok.as_source()).collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn test_offsets_follow_reads() {
    let mut tokenizer = Tokenizer::new("ab{{{");
    assert_eq!(tokenizer.current_read_position(), 0);
    tokenizer.next_token();
    tokenizer.next_token();
    assert_eq!(tokenizer.current_read_position(), 2);
    let (tok, span) = tokenizer.next_token();
    assert_eq!(tok, Token::StartMd);
    assert_eq!((span.start_offset, span.end_offset), (2, 5));
    assert_eq!(tokenizer.next_token().0, Token::Eof);
    assert_eq!(tokenizer.current_read_position(), 5);
}

#[test]
fn test_token_display() {
    assert_eq!(Token::Start.to_string(), "`{{`");
    assert_eq!(Token::EndMd.to_string(), "`}}}`");
    assert_eq!(Token::Eof.to_string(), "end of input");
    assert_eq!(Token::Character("x").to_string(), "character \"x\"");
}
