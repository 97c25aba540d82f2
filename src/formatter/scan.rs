//! Lexical pass over Go source.
//!
//! Tracks string, rune, raw string, and comment state well enough to check
//! bracket balance and to tell the line normalizer which lines sit inside a
//! raw string literal. It is not a tokenizer.

use super::SyntaxError;

/// Raw string state at the edges of one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LineSpan {
    /// The line begins inside a raw string literal.
    pub starts_in_raw: bool,
    /// The line's terminating newline is part of a raw string literal.
    pub ends_in_raw: bool,
}

/// First code token of the file: `(line, column, word)`.
pub(crate) type FirstToken = (usize, usize, String);

/// Result of scanning one source text.
#[derive(Debug)]
pub(crate) struct Scan {
    /// One entry per `'\n'`-separated line, including the piece after the
    /// last newline.
    pub lines: Vec<LineSpan>,
    pub errors: Vec<SyntaxError>,
    pub first_token: Option<FirstToken>,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Code,
    LineComment,
    BlockComment { line: usize, col: usize },
    Str { line: usize, col: usize },
    Rune { line: usize, col: usize },
    Raw { line: usize, col: usize },
}

fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Scan `text` (LF line endings) and collect syntax errors.
///
/// Columns are 1-based byte offsets within the line.
pub(crate) fn scan(text: &str) -> Scan {
    let mut lines = Vec::new();
    let mut errors = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut first_token: Option<FirstToken> = None;
    let mut state = State::Code;
    let mut current = LineSpan::default();
    let (mut line, mut col) = (1usize, 1usize);

    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        let (at_line, at_col) = (line, col);
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += c.len_utf8();
        }

        match state {
            State::Code => {
                let next = chars.peek().map(|&(_, n)| n);
                let opens_comment = c == '/' && matches!(next, Some('/' | '*'));
                if first_token.is_none() && !c.is_whitespace() && !opens_comment {
                    let word: String = text[idx..]
                        .chars()
                        .take_while(|ch| ch.is_alphanumeric() || *ch == '_')
                        .collect();
                    let word = if word.is_empty() { c.to_string() } else { word };
                    first_token = Some((at_line, at_col, word));
                }
                match c {
                    '/' if next == Some('/') => {
                        chars.next();
                        col += 1;
                        state = State::LineComment;
                    }
                    '/' if next == Some('*') => {
                        chars.next();
                        col += 1;
                        state = State::BlockComment {
                            line: at_line,
                            col: at_col,
                        };
                    }
                    '"' => {
                        state = State::Str {
                            line: at_line,
                            col: at_col,
                        }
                    }
                    '\'' => {
                        state = State::Rune {
                            line: at_line,
                            col: at_col,
                        }
                    }
                    '`' => {
                        state = State::Raw {
                            line: at_line,
                            col: at_col,
                        }
                    }
                    '(' | '[' | '{' => stack.push(c),
                    ')' | ']' | '}' => match stack.pop() {
                        Some(open) if closing(open) == c => {}
                        Some(open) => errors.push(SyntaxError::new(
                            at_line,
                            at_col,
                            format!("expected '{}', found '{c}'", closing(open)),
                        )),
                        None => errors.push(SyntaxError::new(
                            at_line,
                            at_col,
                            format!("unexpected '{c}'"),
                        )),
                    },
                    _ => {}
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
            }
            State::BlockComment { .. } => {
                if c == '*' && matches!(chars.peek(), Some((_, '/'))) {
                    chars.next();
                    col += 1;
                    state = State::Code;
                }
            }
            State::Str { line: l, col: cl } | State::Rune { line: l, col: cl } => {
                let quote = if matches!(state, State::Str { .. }) {
                    '"'
                } else {
                    '\''
                };
                match c {
                    '\\' => {
                        if let Some(&(_, n)) = chars.peek().filter(|&&(_, n)| n != '\n') {
                            chars.next();
                            col += n.len_utf8();
                        }
                    }
                    '\n' => {
                        errors.push(unterminated(state, l, cl));
                        state = State::Code;
                    }
                    _ if c == quote => state = State::Code,
                    _ => {}
                }
            }
            State::Raw { .. } => {
                if c == '`' {
                    state = State::Code;
                }
            }
        }

        if c == '\n' {
            let in_raw = matches!(state, State::Raw { .. });
            current.ends_in_raw = in_raw;
            lines.push(current);
            current = LineSpan {
                starts_in_raw: in_raw,
                ends_in_raw: false,
            };
        }
    }
    lines.push(current);

    match state {
        State::BlockComment { line: l, col: cl }
        | State::Str { line: l, col: cl }
        | State::Rune { line: l, col: cl }
        | State::Raw { line: l, col: cl } => errors.push(unterminated(state, l, cl)),
        State::Code | State::LineComment => {}
    }
    if let Some(&open) = stack.last() {
        errors.push(SyntaxError::new(
            line,
            col,
            format!("expected '{}', found 'EOF'", closing(open)),
        ));
    }

    Scan {
        lines,
        errors,
        first_token,
    }
}

fn unterminated(state: State, line: usize, col: usize) -> SyntaxError {
    let what = match state {
        State::BlockComment { .. } => "comment",
        State::Str { .. } => "string literal",
        State::Rune { .. } => "rune literal",
        State::Raw { .. } => "raw string literal",
        State::Code | State::LineComment => "literal",
    };
    SyntaxError::new(line, col, format!("{what} not terminated"))
}
