//! Token stream with cursor awareness for completion
//!
//! Splits a raw command-line buffer into shell words and tracks which word the
//! cursor is on. The lexer never fails: unterminated quotes and trailing
//! backslashes are kept as part of the last word.

use std::ops::Range;

use serde::Serialize;

/// One shell word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Word text with quotes removed and escapes resolved
    pub text: String,
    /// Byte range in the original buffer
    pub span: Range<usize>,
    /// Quote character still open at the end of the word, if any
    pub open_quote: Option<char>,
}

impl Token {
    fn empty_at(offset: usize) -> Self {
        Self {
            text: String::new(),
            span: offset..offset,
            open_quote: None,
        }
    }
}

/// Shell word lexer
struct ShellLexer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> ShellLexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
        }
    }

    fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = ShellLexer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let ch = self.current_char()?;

        let start = self.offset();
        let mut text = String::new();
        let mut quote: Option<char> = None;
        let mut current = Some(ch);

        while let Some(ch) = current {
            match (quote, ch) {
                (None, c) if c.is_whitespace() => break,
                (None, '\'' | '"') => quote = Some(ch),
                (Some(q), c) if c == q => quote = None,
                (Some('\''), c) => text.push(c),
                (_, '\\') => match self.peek_char() {
                    Some(next) => {
                        self.advance();
                        text.push(next);
                    }
                    None => text.push('\\'),
                },
                (_, c) => text.push(c),
            }
            self.advance();
            current = self.current_char();
        }

        Some(Token {
            text,
            span: start..self.offset(),
            open_quote: quote,
        })
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Byte offset of the current character
    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.input.len(), |&(offset, _)| offset)
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos + 1).map(|&(_, c)| c)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

/// Token stream with cursor position tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    /// All words, including the synthesized empty word when the cursor is in whitespace
    pub tokens: Vec<Token>,
    /// Cursor position (byte index, clamped to a char boundary)
    pub cursor: usize,
    /// Index of the word under the cursor
    pub token_index: usize,
    prefix: String,
}

impl TokenStream {
    /// Split `buffer` into words and locate the cursor.
    pub fn tokenize(buffer: &str, cursor: usize) -> Self {
        let cursor = Self::clamp_cursor(buffer, cursor);
        let mut tokens = ShellLexer::tokenize(buffer);

        let token_index = match Self::find_token_at_cursor(&tokens, cursor) {
            Some(index) => index,
            None => {
                // Cursor sits in whitespace: start a fresh, empty word there
                let index = tokens.partition_point(|t| t.span.end < cursor);
                tokens.insert(index, Token::empty_at(cursor));
                index
            }
        };

        let start = tokens[token_index].span.start;
        let prefix = Self::unquote(&buffer[start..cursor]);

        Self {
            tokens,
            cursor,
            token_index,
            prefix,
        }
    }

    fn clamp_cursor(buffer: &str, cursor: usize) -> usize {
        let mut cursor = cursor.min(buffer.len());
        while !buffer.is_char_boundary(cursor) {
            cursor -= 1;
        }
        cursor
    }

    /// Find the word containing or touching the cursor
    fn find_token_at_cursor(tokens: &[Token], cursor: usize) -> Option<usize> {
        tokens
            .iter()
            .position(|t| t.span.start <= cursor && cursor <= t.span.end)
    }

    fn unquote(raw: &str) -> String {
        ShellLexer::new(raw)
            .next_token()
            .map(|t| t.text)
            .unwrap_or_default()
    }

    /// Get all words before the cursor (excluding the word at cursor)
    pub fn tokens_before_cursor(&self) -> &[Token] {
        &self.tokens[..self.token_index]
    }

    /// Get the word under the cursor
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.token_index]
    }

    /// Text of the current word up to the cursor, unquoted
    pub fn current_prefix(&self) -> &str {
        &self.prefix
    }

    /// Get the completion start position (where to insert the completion)
    pub fn completion_start(&self) -> usize {
        self.current_token().span.start
    }
}
