//! Template compiler: tokenizer, parser and the AST it produces.
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod tokens;
