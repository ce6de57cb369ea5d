//! Line-based rendering of the model's lightly Markdown-flavored answers.
//!
//! Only line prefixes are recognized: `# `, `## `, `* ` and `- `. Every other
//! line, blank ones included, is a paragraph. Inline markup is left as is.

use std::fmt::{self, Write as _};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading1(&'a str),
    Heading2(&'a str),
    ListItem(&'a str),
    Paragraph(&'a str),
}

/// Classify each line of `text`, trimmed, into a block.
pub fn parse(text: &str) -> Vec<Block<'_>> {
    text.split('\n').map(|line| classify(line.trim())).collect()
}

fn classify(line: &str) -> Block<'_> {
    if let Some(rest) = line.strip_prefix("## ") {
        Block::Heading2(rest)
    } else if let Some(rest) = line.strip_prefix("# ") {
        Block::Heading1(rest)
    } else if let Some(rest) = line
        .strip_prefix("* ")
        .or_else(|| line.strip_prefix("- "))
    {
        Block::ListItem(rest)
    } else {
        Block::Paragraph(line)
    }
}

impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Heading1(text) => {
                let text = text.to_uppercase();
                write!(f, "{text}\n{}", "=".repeat(text.chars().count()))
            }
            Block::Heading2(text) => write!(f, "{text}\n{}", "-".repeat(text.chars().count())),
            Block::ListItem(text) => write!(f, "  \u{2022} {text}"),
            Block::Paragraph(text) => f.write_str(text),
        }
    }
}

/// Plain-text rendition for a terminal: underlined headings, bulleted list items.
pub fn to_terminal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, block) in parse(text).iter().enumerate() {
        if matches!(block, Block::Heading1(_) | Block::Heading2(_)) && i > 0 {
            out.push('\n');
        }
        // writing to a String cannot fail
        let _ = writeln!(out, "{block}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognizes_line_prefixes() {
        let text = "# Title\n## Section\n* star item\n- dash item\nplain text\n";

        assert_eq!(
            parse(text),
            vec![
                Block::Heading1("Title"),
                Block::Heading2("Section"),
                Block::ListItem("star item"),
                Block::ListItem("dash item"),
                Block::Paragraph("plain text"),
                Block::Paragraph(""),
            ]
        );
    }

    #[test]
    fn test_parse_trims_before_classifying() {
        assert_eq!(
            parse("   ## Indented  \n\t- item\t"),
            vec![Block::Heading2("Indented"), Block::ListItem("item")]
        );
    }

    #[test]
    fn test_markers_need_a_space() {
        assert_eq!(
            parse("#hashtag\n*emphasis*\n-5 degrees\n### Deeper"),
            vec![
                Block::Paragraph("#hashtag"),
                Block::Paragraph("*emphasis*"),
                Block::Paragraph("-5 degrees"),
                Block::Paragraph("### Deeper"),
            ]
        );
    }

    #[test]
    fn test_to_terminal() {
        let rendered = to_terminal("Intro\n## Key Points\n* one");
        assert_eq!(rendered, "Intro\n\nKey Points\n----------\n  \u{2022} one\n");
    }
}
