//! Tokenizer for the HTML subset used in book text
//!
//! Closing a tag pops the open element stack until a matching name is found,
//! so interleaved tags such as `<b><i>text</b>` are accepted. Structural
//! problems that cannot be recovered from are reported as a [`MarkupError`]
//! carrying the byte index at which they were detected.

use thiserror::Error;


#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("Unexpected {found} at index {index}")]
    Unexpected { found: &'static str, index: usize },

    #[error("Expected > at index {index}")]
    ExpectedTagEnd { index: usize },

    #[error("Unexpected </{tag}> expected </{expected}> at index {index}")]
    MismatchedClose {
        tag: String,
        expected: String,
        index: usize,
    },

    #[error("Unfinished opening tag <{tag} at index {index}")]
    UnfinishedOpenTag { tag: String, index: usize },

    #[error("Unfinished closing tag </{tag} at index {index}")]
    UnfinishedCloseTag { tag: String, index: usize },
}

/// Structural event produced while scanning markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    Open(&'a str),
    Attribute(&'a str, &'a str),
    Text(&'a str),
    Close(&'a str),
}

/// Receives events in document order.
#[allow(unused_variables)]
pub trait MarkupVisitor<'a> {
    fn on_open(&mut self, tag: &'a str) {}

    fn on_attribute(&mut self, name: &'a str, value: &'a str) {}

    fn on_text(&mut self, text: &'a str) {}

    fn on_close(&mut self, tag: &'a str) {}
}

impl<'a> MarkupVisitor<'a> for Vec<MarkupEvent<'a>> {
    fn on_open(&mut self, tag: &'a str) {
        self.push(MarkupEvent::Open(tag));
    }

    fn on_attribute(&mut self, name: &'a str, value: &'a str) {
        self.push(MarkupEvent::Attribute(name, value));
    }

    fn on_text(&mut self, text: &'a str) {
        self.push(MarkupEvent::Text(text));
    }

    fn on_close(&mut self, tag: &'a str) {
        self.push(MarkupEvent::Close(tag));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    OpenTag,
    Attributes,
    AttributeValue,
    SelfClosing,
    CloseTag,
}

/// Byte range into the input that grows one character at a time.
#[derive(Debug, Clone, Copy, Default)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    fn get<'a>(&self, input: &'a str) -> &'a str {
        if self.is_empty() {
            ""
        } else {
            &input[self.start..self.end]
        }
    }

    fn clear(&mut self) {
        *self = Span::default();
    }

    fn push(&mut self, index: usize, c: char) {
        if self.is_empty() {
            self.start = index;
        }
        self.end = index + c.len_utf8();
    }
}

/// Tokenize `input`, reporting every event to `visitor`.
///
/// Events seen before an error has been detected are still delivered.
pub fn tokenize<'a, V>(input: &'a str, visitor: &mut V) -> Result<(), MarkupError>
where
    V: MarkupVisitor<'a> + ?Sized,
{
    let mut state = State::Text;
    let mut stack: Vec<&'a str> = Vec::new();
    let mut text = Span::default();
    let mut tag = Span::default();
    let mut attribute = Span::default();
    let mut value = Span::default();

    for (index, c) in input.char_indices() {
        match state {
            State::Text => {
                if c == '<' {
                    if !text.is_empty() {
                        visitor.on_text(text.get(input));
                        text.clear();
                    }
                    tag.clear();
                    state = State::OpenTag;
                } else {
                    text.push(index, c);
                }
            }
            State::OpenTag => {
                if c == '/' {
                    if tag.is_empty() {
                        if stack.is_empty() {
                            return Err(MarkupError::Unexpected { found: "/", index });
                        }
                        state = State::CloseTag;
                    } else {
                        visitor.on_open(tag.get(input));
                        state = State::SelfClosing;
                    }
                } else if c == '<' {
                    return Err(MarkupError::Unexpected { found: "<", index });
                } else if c == '>' {
                    let name = tag.get(input);
                    visitor.on_open(name);
                    stack.push(name);
                    state = State::Text;
                } else if c.is_whitespace() {
                    visitor.on_open(tag.get(input));
                    attribute.clear();
                    value.clear();
                    state = State::Attributes;
                } else {
                    tag.push(index, c);
                }
            }
            State::Attributes => {
                if c == '=' {
                    if attribute.is_empty() {
                        return Err(MarkupError::Unexpected { found: "=", index });
                    }
                    value.clear();
                    state = State::AttributeValue;
                } else if c == '/' {
                    flush_attribute(input, &mut attribute, &mut value, visitor);
                    state = State::SelfClosing;
                } else if c == '>' {
                    flush_attribute(input, &mut attribute, &mut value, visitor);
                    stack.push(tag.get(input));
                    state = State::Text;
                } else if c.is_whitespace() {
                    flush_attribute(input, &mut attribute, &mut value, visitor);
                } else {
                    attribute.push(index, c);
                }
            }
            State::AttributeValue => {
                let quoted = value.get(input).starts_with('"');
                if c == '"' {
                    if quoted {
                        // The buffer holds the opening quote as its first character.
                        let raw = value.get(input);
                        visitor.on_attribute(attribute.get(input), &raw[1..]);
                        attribute.clear();
                        value.clear();
                        state = State::Attributes;
                    } else if !value.is_empty() {
                        return Err(MarkupError::Unexpected { found: "\"", index });
                    } else {
                        value.push(index, c);
                    }
                } else if quoted {
                    value.push(index, c);
                } else if c == '/' {
                    flush_attribute(input, &mut attribute, &mut value, visitor);
                    state = State::SelfClosing;
                } else if c == '>' {
                    flush_attribute(input, &mut attribute, &mut value, visitor);
                    stack.push(tag.get(input));
                    state = State::Text;
                } else if c.is_whitespace() {
                    if value.is_empty() {
                        return Err(MarkupError::Unexpected {
                            found: "space",
                            index,
                        });
                    }
                    flush_attribute(input, &mut attribute, &mut value, visitor);
                    state = State::Attributes;
                } else {
                    value.push(index, c);
                }
            }
            State::SelfClosing => {
                if c != '>' {
                    return Err(MarkupError::ExpectedTagEnd { index });
                }
                visitor.on_close(tag.get(input));
                state = State::Text;
            }
            State::CloseTag => {
                if c == '>' {
                    let name = tag.get(input);
                    close_element(&mut stack, name, index)?;
                    visitor.on_close(name);
                    state = State::Text;
                } else {
                    tag.push(index, c);
                }
            }
        }
    }

    match state {
        State::Text => {
            if !text.is_empty() {
                visitor.on_text(text.get(input));
            }
            Ok(())
        }
        State::CloseTag => Err(MarkupError::UnfinishedCloseTag {
            tag: tag.get(input).to_string(),
            index: tag.start,
        }),
        State::OpenTag | State::Attributes | State::AttributeValue | State::SelfClosing => {
            Err(MarkupError::UnfinishedOpenTag {
                tag: tag.get(input).to_string(),
                index: tag.start,
            })
        }
    }
}

/// Collect every event of `input` into a vector.
pub fn events(input: &str) -> Result<Vec<MarkupEvent<'_>>, MarkupError> {
    let mut events = Vec::new();
    tokenize(input, &mut events)?;
    Ok(events)
}

fn flush_attribute<'a, V>(input: &'a str, attribute: &mut Span, value: &mut Span, visitor: &mut V)
where
    V: MarkupVisitor<'a> + ?Sized,
{
    if !attribute.is_empty() {
        visitor.on_attribute(attribute.get(input), value.get(input));
    }
    attribute.clear();
    value.clear();
}

/// Pop until `name` is found. Exhausting the stack is an error naming both
/// the closed tag and the element that was on top.
///
/// Close tags only start while the stack is non-empty.
fn close_element(stack: &mut Vec<&str>, name: &str, index: usize) -> Result<(), MarkupError> {
    debug_assert!(!stack.is_empty());
    let expected = stack.last().copied().unwrap_or_default();
    while let Some(open) = stack.pop() {
        if open == name {
            return Ok(());
        }
    }
    Err(MarkupError::MismatchedClose {
        tag: name.to_string(),
        expected: expected.to_string(),
        index,
    })
}
