//! Lexical map of schema source text
//!
//! Records, for every byte, whether it is code (as opposed to a comment, a
//! string literal or a regex literal) and how many `{` are open at that point. This is all the
//! structure the scanner needs; it is not a tokenizer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Str(u8),
    Regex { class: bool },
}

/// Per-byte code mask and brace depth
#[derive(Debug)]
pub struct SourceMap<'s> {
    bytes: &'s [u8],
    code: Vec<bool>,
    depth: Vec<u32>,
}

impl<'s> SourceMap<'s> {
    pub fn new(source: &'s str) -> Self {
        // All delimiters are ASCII, so walking bytes never splits a UTF-8
        // sequence in a way that matters.
        let bytes = source.as_bytes();
        let mut code = vec![false; bytes.len()];
        let mut depth = vec![0; bytes.len()];

        let mut state = State::Code;
        let mut level: u32 = 0;
        // Last non-blank code byte; decides whether `/` opens a regex literal
        let mut prev: Option<u8> = None;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            let next = bytes.get(i + 1).copied();
            depth[i] = level;

            match state {
                State::Code => {
                    match b {
                        b'/' if next == Some(b'/') => {
                            state = State::LineComment;
                        }
                        b'/' if next == Some(b'*') => {
                            state = State::BlockComment;
                            depth[i + 1] = level;
                            i += 1;
                        }
                        b'/' if regex_may_follow(prev) => state = State::Regex { class: false },
                        b'\'' | b'"' | b'`' => state = State::Str(b),
                        b'{' => {
                            code[i] = true;
                            level += 1;
                        }
                        b'}' => {
                            level = level.saturating_sub(1);
                            depth[i] = level;
                            code[i] = true;
                        }
                        _ => code[i] = true,
                    }

                    if !matches!(state, State::LineComment | State::BlockComment)
                        && !b.is_ascii_whitespace()
                    {
                        prev = Some(b);
                    }
                }
                State::LineComment => {
                    if b == b'\n' {
                        state = State::Code;
                    }
                }
                State::BlockComment => {
                    if b == b'*' && next == Some(b'/') {
                        depth[i + 1] = level;
                        i += 1;
                        state = State::Code;
                    }
                }
                State::Str(quote) => {
                    if b == b'\\' {
                        if i + 1 < bytes.len() {
                            depth[i + 1] = level;
                        }
                        i += 1;
                    } else if b == quote || (b == b'\n' && quote != b'`') {
                        state = State::Code;
                    }
                }
                State::Regex { class } => {
                    if b == b'\\' {
                        if i + 1 < bytes.len() {
                            depth[i + 1] = level;
                        }
                        i += 1;
                    } else if b == b'\n' {
                        // Unterminated; it was a division after all
                        state = State::Code;
                    } else if class {
                        if b == b']' {
                            state = State::Regex { class: false };
                        }
                    } else if b == b'[' {
                        state = State::Regex { class: true };
                    } else if b == b'/' {
                        state = State::Code;
                        prev = Some(b);
                    }
                }
            }

            i += 1;
        }

        Self { bytes, code, depth }
    }

    /// Whether the byte at `offset` is outside comments and string literals
    pub fn is_code(&self, offset: usize) -> bool {
        self.code.get(offset).copied().unwrap_or(false)
    }

    /// Number of open braces before the byte at `offset`
    pub fn depth_at(&self, offset: usize) -> u32 {
        self.depth.get(offset).copied().unwrap_or(0)
    }

    /// Offset of the bracket closing the one at `open`.
    ///
    /// Works for `(`, `[` and `{`; brackets inside comments and strings are
    /// ignored.
    pub fn matching_close(&self, open: usize) -> Option<usize> {
        let opener = *self.bytes.get(open)?;
        let closer = match opener {
            b'(' => b')',
            b'[' => b']',
            b'{' => b'}',
            _ => return None,
        };

        if !self.is_code(open) {
            return None;
        }

        let mut balance = 0usize;
        for (offset, &b) in self.bytes.iter().enumerate().skip(open) {
            if !self.is_code(offset) {
                continue;
            }
            if b == opener {
                balance += 1;
            } else if b == closer {
                balance -= 1;
                if balance == 0 {
                    return Some(offset);
                }
            }
        }

        None
    }
}

/// Whether a `/` after `prev` starts an expression rather than dividing one
fn regex_may_follow(prev: Option<u8>) -> bool {
    matches!(
        prev,
        None | Some(b'(' | b',' | b'=' | b':' | b'[' | b'!' | b'&' | b'|' | b'?' | b'{' | b';')
    )
}
