//! Statement language front end and execution engine
//!
//! Pipeline:
//! - Binder: substitutes positional `?` parameters into the raw text
//! - Lexer: tokenizes the bound statement (quote-aware)
//! - Parser: builds a typed AST from tokens
//! - Evaluator: WHERE-clause matching, coercion and aggregates
//! - Engine: executes the AST against the table store

pub mod ast;
pub mod binder;
pub mod evaluator;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Statement;
pub use binder::bind;
pub use executor::{Engine, StatementOutcome};
pub use lexer::Lexer;
pub use parser::{parse_statement, Parser};
pub use token::{Token, TokenType};
