//! Token types for the SQL lexer

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Keywords
    Select,
    From,
    Where,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Create,
    Table,
    Drop,
    And,
    Or,
    Like,
    In,
    Null,
    As,
    Order,
    By,
    Distinct,
    Primary,
    Key,
    Join, // recognized only to be rejected

    // Operators
    Eq, // =
    Ne, // <>
    Lt, // <
    Gt, // >

    // Delimiters
    LParen,
    RParen,
    Comma,
    Star,
    Semicolon,

    /// Positional `?` parameter marker. Normally consumed by the binder
    /// before lexing; reaching the parser means a parameter went unbound.
    Placeholder,

    // Literals
    Number(f64),
    String(String),
    Identifier(String),

    // Special
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, column: usize) -> Self {
        Self { token_type, column }
    }
}

impl TokenType {
    /// Keyword lookup, case-insensitive. Declared type names (TEXT, DECIMAL,
    /// ...) are deliberately not keywords: the parser resolves them from
    /// identifiers so that unrecognized names can default to TEXT.
    pub fn from_keyword(s: &str) -> Option<Self> {
        let token = match s.to_ascii_lowercase().as_str() {
            "select" => TokenType::Select,
            "from" => TokenType::From,
            "where" => TokenType::Where,
            "insert" => TokenType::Insert,
            "into" => TokenType::Into,
            "values" => TokenType::Values,
            "update" => TokenType::Update,
            "set" => TokenType::Set,
            "delete" => TokenType::Delete,
            "create" => TokenType::Create,
            "table" => TokenType::Table,
            "drop" => TokenType::Drop,
            "and" => TokenType::And,
            "or" => TokenType::Or,
            "like" => TokenType::Like,
            "in" => TokenType::In,
            "null" => TokenType::Null,
            "as" => TokenType::As,
            "order" => TokenType::Order,
            "by" => TokenType::By,
            "distinct" => TokenType::Distinct,
            "primary" => TokenType::Primary,
            "key" => TokenType::Key,
            "join" => TokenType::Join,
            _ => return None,
        };
        Some(token)
    }
}
