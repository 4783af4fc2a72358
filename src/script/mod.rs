//! Embedded script handling: splitting bodies into lines and recognising
//! the handful of commands that reference other records.

mod tokenizer;

pub use tokenizer::{ScriptEvent, tokenize_line};

/// One non-blank line of a script body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine<'a> {
    /// Code before the first `;`, trimmed and lower-cased.
    pub code: String,
    /// Comment text after the first `;`, trimmed.
    pub comment: &'a str,
}

/// Split a script body into lines, separating trailing comments.
///
/// Lines with neither code nor comment are skipped.
pub fn lines(body: &str) -> impl Iterator<Item = ScriptLine<'_>> {
    body.trim().split('\n').filter_map(|line| {
        let (code, comment) = match line.find(';') {
            Some(start) => (&line[..start], line[start + 1..].trim()),
            None => (line, ""),
        };
        let code = code.trim().to_lowercase();
        if code.is_empty() && comment.is_empty() {
            None
        } else {
            Some(ScriptLine { code, comment })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_comments_and_skip_blanks() {
        let body = "Begin Test\r\n\n  StartScript Foo ; kick off\n; TODO: remove\n   \nEnd";
        let lines: Vec<_> = lines(body).collect();

        assert_eq!(
            lines,
            vec![
                ScriptLine {
                    code: "begin test".to_string(),
                    comment: ""
                },
                ScriptLine {
                    code: "startscript foo".to_string(),
                    comment: "kick off"
                },
                ScriptLine {
                    code: String::new(),
                    comment: "TODO: remove"
                },
                ScriptLine {
                    code: "end".to_string(),
                    comment: ""
                },
            ]
        );
    }

    #[test]
    fn test_lines_of_empty_body() {
        assert_eq!(lines("").count(), 0);
        assert_eq!(lines("  \n ; \n").count(), 0);
    }
}
