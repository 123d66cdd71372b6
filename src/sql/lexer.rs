//! SQL lexer - converts statement text into tokens
//!
//! Quote-aware: a keyword, comma or parenthesis inside a single-quoted
//! literal is never treated as a separator. Embedded quotes are doubled
//! (`''`), matching the binder's rendering.

use super::token::{Token, TokenType};
use crate::error::{DbError, Result};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let column = self.position + 1;

        if self.is_eof() {
            return Ok(Token::new(TokenType::Eof, column));
        }

        let ch = self.current_char();
        let token_type = match ch {
            '\'' => self.read_string()?,
            '0'..='9' | '.' => self.read_number()?,
            '-' => {
                // Only negative numeric literals; there is no arithmetic.
                if matches!(self.peek_char(), Some('0'..='9') | Some('.')) {
                    self.advance();
                    match self.read_number()? {
                        TokenType::Number(n) => TokenType::Number(-n),
                        other => other,
                    }
                } else {
                    return Err(DbError::Syntax(format!(
                        "unexpected character '-' at position {}",
                        column
                    )));
                }
            }
            'a'..='z' | 'A'..='Z' | '_' => self.read_identifier(),
            '=' => {
                self.advance();
                TokenType::Eq
            }
            '<' => {
                self.advance();
                if self.current_char() == '>' {
                    self.advance();
                    TokenType::Ne
                } else {
                    TokenType::Lt
                }
            }
            '>' => {
                self.advance();
                TokenType::Gt
            }
            '(' => {
                self.advance();
                TokenType::LParen
            }
            ')' => {
                self.advance();
                TokenType::RParen
            }
            ',' => {
                self.advance();
                TokenType::Comma
            }
            '*' => {
                self.advance();
                TokenType::Star
            }
            ';' => {
                self.advance();
                TokenType::Semicolon
            }
            '?' => {
                self.advance();
                TokenType::Placeholder
            }
            _ => {
                return Err(DbError::Syntax(format!(
                    "unexpected character '{}' at position {}",
                    ch, column
                )));
            }
        };

        Ok(Token::new(token_type, column))
    }

    fn current_char(&self) -> char {
        if self.is_eof() {
            '\0'
        } else {
            self.input[self.position]
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        if !self.is_eof() {
            self.position += 1;
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Read a single-quoted string. A doubled quote (`''`) is an embedded
    /// quote, not a terminator.
    fn read_string(&mut self) -> Result<TokenType> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            if self.is_eof() {
                return Err(DbError::Syntax("unterminated string literal".to_string()));
            }
            let ch = self.current_char();
            if ch == '\'' {
                if self.peek_char() == Some('\'') {
                    value.push('\'');
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // closing quote
                    break;
                }
            } else {
                value.push(ch);
                self.advance();
            }
        }

        Ok(TokenType::String(value))
    }

    fn read_number(&mut self) -> Result<TokenType> {
        let mut value = String::new();

        while !self.is_eof() && (self.current_char().is_ascii_digit() || self.current_char() == '.')
        {
            value.push(self.current_char());
            self.advance();
        }

        value
            .parse::<f64>()
            .map(TokenType::Number)
            .map_err(|_| DbError::Syntax(format!("invalid number: {}", value)))
    }

    fn read_identifier(&mut self) -> TokenType {
        let mut value = String::new();

        while !self.is_eof() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        TokenType::from_keyword(&value).unwrap_or(TokenType::Identifier(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        let tokens = Lexer::new("SELECT * FROM users").tokenize().unwrap();
        assert_eq!(tokens.len(), 5); // SELECT, *, FROM, users, EOF
        assert!(matches!(tokens[0].token_type, TokenType::Select));
        assert!(matches!(tokens[1].token_type, TokenType::Star));
        assert!(matches!(tokens[2].token_type, TokenType::From));
        assert!(matches!(tokens[3].token_type, TokenType::Identifier(_)));
        assert!(matches!(tokens[4].token_type, TokenType::Eof));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let tokens = Lexer::new("select From WHERE oRdEr by").tokenize().unwrap();
        assert!(matches!(tokens[0].token_type, TokenType::Select));
        assert!(matches!(tokens[1].token_type, TokenType::From));
        assert!(matches!(tokens[2].token_type, TokenType::Where));
        assert!(matches!(tokens[3].token_type, TokenType::Order));
        assert!(matches!(tokens[4].token_type, TokenType::By));
    }

    #[test]
    fn test_doubled_quote_is_embedded() {
        let tokens = Lexer::new("'it''s'").tokenize().unwrap();
        assert!(matches!(tokens[0].token_type, TokenType::String(ref s) if s == "it's"));
    }

    #[test]
    fn test_keyword_inside_literal_is_text() {
        let tokens = Lexer::new("'WHERE FROM, (AND)'").tokenize().unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0].token_type, TokenType::String(ref s) if s == "WHERE FROM, (AND)"));
    }

    #[test]
    fn test_operators() {
        let tokens = Lexer::new("= <> < >").tokenize().unwrap();
        assert!(matches!(tokens[0].token_type, TokenType::Eq));
        assert!(matches!(tokens[1].token_type, TokenType::Ne));
        assert!(matches!(tokens[2].token_type, TokenType::Lt));
        assert!(matches!(tokens[3].token_type, TokenType::Gt));
    }

    #[test]
    fn test_negative_number() {
        let tokens = Lexer::new("-12.5").tokenize().unwrap();
        assert!(matches!(tokens[0].token_type, TokenType::Number(n) if n == -12.5));
    }

    #[test]
    fn test_placeholder_token() {
        let tokens = Lexer::new("WHERE a = ?").tokenize().unwrap();
        assert!(matches!(tokens[3].token_type, TokenType::Placeholder));
    }

    #[test]
    fn test_unterminated_string_fails() {
        assert!(Lexer::new("'abc").tokenize().is_err());
    }
}
