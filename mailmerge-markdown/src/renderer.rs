use crate::parser::Block;

/// Renders blocks to HTML.
///
/// Consecutive items share one `<ul>`.  Top level fragments are separated
/// by a newline.  Text is emitted as is, without escaping.
pub fn render(blocks: &[Block]) -> String {
    let mut fragments = Vec::new();
    let mut iter = blocks.iter().peekable();
    while let Some(block) = iter.next() {
        let mut out = String::new();
        match block {
            Block::Heading { level, text } => {
                out.push_str(&format!("<h{level}>{text}</h{level}>"));
            }
            Block::Paragraph { text } => {
                out.push_str(&format!("<p>{text}</p>"));
            }
            Block::Item { text } => {
                out.push_str("<ul>");
                out.push_str(&format!("<li>{text}</li>"));
                while let Some(Block::Item { text }) = iter.peek() {
                    out.push_str(&format!("<li>{text}</li>"));
                    iter.next();
                }
                out.push_str("</ul>");
            }
        }
        fragments.push(out);
    }
    fragments.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    use similar_asserts::assert_eq;

    #[test]
    fn test_items_are_grouped() {
        let blocks = vec![
            Block::Item { text: "A".into() },
            Block::Item { text: "B".into() },
            Block::Paragraph { text: "C".into() },
            Block::Item { text: "D".into() },
        ];
        assert_eq!(
            render(&blocks),
            "<ul><li>A</li><li>B</li></ul>\n<p>C</p>\n<ul><li>D</li></ul>"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(render(&[]), "");
    }
}
