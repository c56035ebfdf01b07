//! The markdown dialect used by mailmerge's `{{{ ... }}}` interpolations.
//!
//! Only a small subset of markdown is understood:
//!
//! - `# Heading` up to any level (`## Heading`, `### Heading`, ...)
//! - `* item` list items, consecutive items form one list
//! - paragraphs, separated by blank lines
//!
//! Everything else is passed through as text.  No HTML escaping is
//! performed.
//!
//! ```
//! use mailmerge_markdown::render_markdown;
//!
//! assert_eq!(
//!     render_markdown("# Heading\nLorem ipsum"),
//!     "<h1>Heading</h1>\n<p>Lorem ipsum</p>"
//! );
//! ```
pub mod lexer;
pub mod parser;
pub mod renderer;

/// Converts markdown into HTML.
///
/// This never fails, every input is valid.
pub fn render_markdown(text: &str) -> String {
    let blocks = parser::Parser::new(lexer::Lexer::new(text)).parse();
    renderer::render(&blocks)
}
