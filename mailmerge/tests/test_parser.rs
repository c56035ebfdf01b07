use similar_asserts::assert_eq;

use mailmerge::machinery::ast::Block;
use mailmerge::machinery::parse;
use mailmerge::{compile, ErrorKind};

fn describe(blocks: &[Block<'_>]) -> Vec<String> {
    blocks
        .iter()
        .map(|block| match block {
            Block::Text(text) => format!("text {:?}", text.content),
            Block::Replace(replace) => format!("replace {}", replace.path),
            Block::MdReplace(replace) => format!("md {}", replace.path),
            Block::If(cond) => format!(
                "if {} then {:?} else {:?}",
                cond.condition,
                describe(&cond.consequence),
                describe(&cond.alternative)
            ),
            Block::Loop(each) => format!("each {} do {:?}", each.source, describe(&each.body)),
        })
        .collect()
}

fn parse_ok(source: &str) -> Vec<String> {
    describe(&compile(source).unwrap().blocks)
}

fn parse_err(source: &str) -> (ErrorKind, String) {
    let err = compile(source).unwrap_err();
    (err.kind(), err.to_string())
}

#[test]
fn test_text_and_interpolation() {
    assert_eq!(
        parse_ok("Hello {{ name }}!"),
        vec!["text \"Hello \"", "replace name", "text \"!\""]
    );
    assert_eq!(parse_ok("{{name}}"), vec!["replace name"]);
    assert_eq!(parse_ok("{{{  body }}}"), vec!["md body"]);
    assert!(parse_ok("").is_empty());
}

#[test]
fn test_stray_closing_delimiters_are_text() {
    assert_eq!(parse_ok("a }} b }}} c"), vec!["text \"a }} b }}} c\""]);
}

#[test]
fn test_if() {
    assert_eq!(
        parse_ok("{{#if show}}Y{{/if}}"),
        vec!["if show then [\"text \\\"Y\\\"\"] else []"]
    );
    assert_eq!(
        parse_ok("{{#if show }}A{{else}}B{{/if}}"),
        vec!["if show then [\"text \\\"A\\\"\"] else [\"text \\\"B\\\"\"]"]
    );
}

#[test]
fn test_nested_if() {
    let ast = compile("{{#if somebool }}{{#if otherbool}}Lorem ipsum{{/if}}{{/if}}").unwrap();
    assert_eq!(ast.blocks.len(), 1);
    match &ast.blocks[0] {
        Block::If(outer) => {
            assert_eq!(outer.condition, "somebool");
            assert!(outer.alternative.is_empty());
            match &outer.consequence[..] {
                [Block::If(inner)] => {
                    assert_eq!(inner.condition, "otherbool");
                    assert_eq!(describe(&inner.consequence), vec!["text \"Lorem ipsum\""]);
                }
                other => panic!("unexpected consequence {other:?}"),
            }
        }
        other => panic!("unexpected block {other:?}"),
    }
}

#[test]
fn test_elseif_chain() {
    let ast = compile("{{#if a}}X{{elseif b}}Y{{else}}Z{{/if}}tail").unwrap();
    assert_eq!(ast.blocks.len(), 2);
    match &ast.blocks[0] {
        Block::If(cond) => {
            assert_eq!(cond.condition, "a");
            match &cond.alternative[..] {
                [Block::If(nested)] => {
                    assert_eq!(nested.condition, "b");
                    assert_eq!(describe(&nested.consequence), vec!["text \"Y\""]);
                    assert_eq!(describe(&nested.alternative), vec!["text \"Z\""]);
                }
                other => panic!("unexpected alternative {other:?}"),
            }
        }
        other => panic!("unexpected block {other:?}"),
    }
    assert_eq!(describe(&ast.blocks[1..]), vec!["text \"tail\""]);
}

#[test]
fn test_each() {
    assert_eq!(
        parse_ok("{{#each items}}<{{this.A}}>{{/each}}"),
        vec!["each items do [\"text \\\"<\\\"\", \"replace this.A\", \"text \\\">\\\"\"]"]
    );
}

#[test]
fn test_words_starting_with_else_are_paths() {
    assert_eq!(
        parse_ok("{{#if a}}{{elsewhere}}{{/if}}"),
        vec!["if a then [\"replace elsewhere\"] else []"]
    );
}

#[test]
fn test_spans() {
    let ast = parse("ab\n{{ name }}", "spans").unwrap();
    let span = ast.blocks[1].span();
    assert_eq!((span.start_line, span.start_col), (2, 0));
    assert_eq!((span.end_line, span.end_col), (2, 10));
    assert_eq!(ast.blocks[1].description(), "interpolation");
}

#[test]
fn test_unknown_directive() {
    insta::assert_snapshot!(
        parse_err("{{#bogus x}}{{/bogus}}").1,
        @"unknown directive: unknown directive `bogus` (in <string>:1)"
    );
    assert_eq!(
        parse_err("{{#unknownconditional asdf }}{{/unknownconditional}}").0,
        ErrorKind::UnknownDirective
    );
}

#[test]
fn test_malformed_blocks() {
    insta::assert_snapshot!(
        parse_err("{{#if a}}x{{/each}}").1,
        @"malformed block: mismatched closing tag: expected `/if`, found `/each` (in <string>:1)"
    );
    insta::assert_snapshot!(
        parse_err("{{#if a}}x").1,
        @"malformed block: unexpected end of input, expected `{{/if}}` (in <string>:1)"
    );
    insta::assert_snapshot!(
        parse_err("{{ name").1,
        @"malformed block: unexpected end of input, expected `}}` (in <string>:1)"
    );
    insta::assert_snapshot!(
        parse_err("{{ a }}}").1,
        @"malformed block: unexpected `}}}`, expected `}}` (in <string>:1)"
    );
    insta::assert_snapshot!(
        parse_err("x{{/if}}").1,
        @r###"malformed block: unexpected tag "/if" outside of a block (in <string>:1)"###
    );
    insta::assert_snapshot!(
        parse_err("{{#each items}}{{else}}{{/each}}").1,
        @r###"malformed block: unexpected tag "else" in `each` block, expected `/each` (in <string>:1)"###
    );
    insta::assert_snapshot!(
        parse_err("{{#if}}x{{/if}}").1,
        @"malformed block: missing condition in `if` directive (in <string>:1)"
    );

    for source in ["{{}}", "{{ }}", "{{{ }}}", "{{else}}", "{{#if a}}{{else}}{{else}}{{/if}}"] {
        assert_eq!(parse_err(source).0, ErrorKind::MalformedBlock, "{source}");
    }
}

#[test]
fn test_error_line_numbers() {
    let err = parse("line 1\nline 2\n{{#if x}}\n{{/each}}", "letter.txt").unwrap_err();
    assert_eq!(err.name(), Some("letter.txt"));
    assert_eq!(err.line(), Some(4));
}
