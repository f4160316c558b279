// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Code view of a script with comments and literal bodies blanked.
//!
//! ```text
//! source   var a = require('./a'); // require('./b')
//! view     var a = require('   ');
//! ```
//!
//! Every blanked byte becomes a space and line breaks are kept, so byte
//! offsets in the view are byte offsets in the source. String, regular
//! expression and template delimiters stay in place; template
//! substitutions (`${...}`) are code and are scanned normally.

/// Keywords after which `/` starts a regular expression literal.
const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case",
    "do", "else", "yield", "await",
];

enum Frame {
    Brace,
    Template,
}

struct Scanner<'a> {
    bytes: &'a [u8],
    blank: Vec<bool>,
    stack: Vec<Frame>,
    /// Position of the last significant code byte.
    last: Option<usize>,
}

/// Returns `source` with comments and the contents of string, template and
/// regular expression literals replaced by spaces.
#[must_use]
pub fn code_view(source: &str) -> String {
    let mut scanner = Scanner {
        bytes: source.as_bytes(),
        blank: vec![false; source.len()],
        stack: Vec::new(),
        last: None,
    };
    scanner.run();

    let mut view = String::with_capacity(source.len());
    for (i, c) in source.char_indices() {
        if scanner.blank[i] {
            view.extend(std::iter::repeat_n(' ', c.len_utf8()));
        } else {
            view.push(c);
        }
    }
    view
}

impl Scanner<'_> {
    fn at(&self, i: usize) -> Option<u8> {
        self.bytes.get(i).copied()
    }

    fn blank_range(&mut self, start: usize, end: usize) {
        for i in start..end.min(self.bytes.len()) {
            if !matches!(self.bytes[i], b'\n' | b'\r') {
                self.blank[i] = true;
            }
        }
    }

    fn run(&mut self) {
        let mut i = 0;
        if self.bytes.starts_with(b"#!") {
            i = self.line_end(0);
            self.blank_range(0, i);
        }

        while let Some(b) = self.at(i) {
            i = match b {
                b'/' if self.at(i + 1) == Some(b'/') => {
                    let end = self.line_end(i);
                    self.blank_range(i, end);
                    end
                }
                b'/' if self.at(i + 1) == Some(b'*') => {
                    let end = self.block_comment_end(i + 2);
                    self.blank_range(i, end);
                    end
                }
                b'/' if self.regex_allowed() => {
                    let end = self.regex_end(i + 1);
                    self.last = Some(end.saturating_sub(1));
                    end
                }
                b'\'' | b'"' => {
                    let end = self.string_end(i + 1, b);
                    self.last = Some(end.saturating_sub(1));
                    end
                }
                b'`' => self.template(i + 1),
                b'{' => {
                    self.stack.push(Frame::Brace);
                    self.last = Some(i);
                    i + 1
                }
                b'}' => {
                    if let Some(Frame::Template) = self.stack.pop() {
                        self.template(i + 1)
                    } else {
                        self.last = Some(i);
                        i + 1
                    }
                }
                _ => {
                    if !b.is_ascii_whitespace() {
                        self.last = Some(i);
                    }
                    i + 1
                }
            };
        }
    }

    fn line_end(&self, from: usize) -> usize {
        self.bytes[from..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |offset| from + offset)
    }

    fn block_comment_end(&self, from: usize) -> usize {
        self.bytes[from.min(self.bytes.len())..]
            .windows(2)
            .position(|pair| pair == b"*/")
            .map_or(self.bytes.len(), |offset| from + offset + 2)
    }

    /// Blanks a string body; returns the position after the closing quote.
    /// An unterminated string ends at the line break.
    fn string_end(&mut self, from: usize, quote: u8) -> usize {
        let mut i = from;
        while let Some(b) = self.at(i) {
            match b {
                b'\\' => i += 2,
                b'\n' => break,
                _ if b == quote => {
                    self.blank_range(from, i);
                    return i + 1;
                }
                _ => i += 1,
            }
        }
        let end = i.min(self.bytes.len());
        self.blank_range(from, end);
        end
    }

    fn regex_end(&mut self, from: usize) -> usize {
        let mut i = from;
        let mut in_class = false;
        while let Some(b) = self.at(i) {
            match b {
                b'\\' => i += 2,
                b'\n' => break,
                b'[' => {
                    in_class = true;
                    i += 1;
                }
                b']' => {
                    in_class = false;
                    i += 1;
                }
                b'/' if !in_class => {
                    self.blank_range(from, i);
                    return i + 1;
                }
                _ => i += 1,
            }
        }
        // Not a literal after all; leave the line as code
        from
    }

    /// Blanks template text from `from`; returns the position after the
    /// closing backtick, or after `${` with a template frame pushed.
    fn template(&mut self, from: usize) -> usize {
        let mut i = from;
        while let Some(b) = self.at(i) {
            match b {
                b'\\' => i += 2,
                b'`' => {
                    self.blank_range(from, i);
                    self.last = Some(i);
                    return i + 1;
                }
                b'$' if self.at(i + 1) == Some(b'{') => {
                    self.blank_range(from, i);
                    self.stack.push(Frame::Template);
                    self.last = Some(i + 1);
                    return i + 2;
                }
                _ => i += 1,
            }
        }
        self.blank_range(from, self.bytes.len());
        self.bytes.len()
    }

    fn regex_allowed(&self) -> bool {
        let Some(last) = self.last else {
            return true;
        };
        let b = self.bytes[last];
        if b"(,=:[!&|?{};+-*%<>~^".contains(&b) {
            return true;
        }
        if !is_word_byte(b) {
            return false;
        }
        let start = self.bytes[..=last]
            .iter()
            .rposition(|&c| !is_word_byte(c))
            .map_or(0, |p| p + 1);
        std::str::from_utf8(&self.bytes[start..=last])
            .is_ok_and(|word| REGEX_KEYWORDS.contains(&word))
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
