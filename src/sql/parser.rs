//! SQL parser - converts tokens into an AST
//!
//! Recursive descent over the token stream. Statements are classified by
//! their leading keyword; clause keywords are tokens, so a keyword inside a
//! string literal can never start a clause.

use super::ast::*;
use super::token::{Token, TokenType};
use crate::error::{DbError, Result};
use crate::types::ColumnType;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse one statement, requiring the whole input to be consumed.
    pub fn parse(&mut self) -> Result<Statement> {
        let stmt = match &self.current().token_type {
            TokenType::Create => Statement::CreateTable(self.parse_create()?),
            TokenType::Drop => Statement::DropTable(self.parse_drop()?),
            TokenType::Insert => Statement::Insert(self.parse_insert()?),
            TokenType::Update => Statement::Update(self.parse_update()?),
            TokenType::Delete => Statement::Delete(self.parse_delete()?),
            TokenType::Select => Statement::Select(self.parse_select()?),
            _ => {
                return Err(self.error("expected CREATE, DROP, INSERT, UPDATE, DELETE, or SELECT"))
            }
        };

        self.match_token(TokenType::Semicolon);
        if !matches!(self.current().token_type, TokenType::Eof) {
            return Err(self.error("unexpected trailing input"));
        }

        Ok(stmt)
    }

    /// CREATE TABLE name (col TYPE[(n[,m])], ..., [PRIMARY KEY (col, ...)])
    fn parse_create(&mut self) -> Result<CreateTableStmt> {
        self.expect(TokenType::Create)?;
        self.expect(TokenType::Table)?;
        let table = self.parse_identifier()?;
        self.expect(TokenType::LParen)?;

        let mut columns = Vec::new();
        let mut primary_key = Vec::new();

        loop {
            if self.match_token(TokenType::Primary) {
                self.expect(TokenType::Key)?;
                self.expect(TokenType::LParen)?;
                if !primary_key.is_empty() {
                    return Err(self.error("duplicate PRIMARY KEY clause"));
                }
                loop {
                    primary_key.push(self.parse_identifier()?);
                    if !self.match_token(TokenType::Comma) {
                        break;
                    }
                }
                self.expect(TokenType::RParen)?;
            } else {
                let name = self.parse_identifier()?;
                let col_type = self.parse_column_type()?;
                columns.push(ColumnSpec { name, col_type });
            }

            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        self.expect(TokenType::RParen)?;

        if columns.is_empty() {
            return Err(self.error("CREATE TABLE requires at least one column"));
        }

        Ok(CreateTableStmt {
            table,
            columns,
            primary_key,
        })
    }

    /// Type spec: TYPENAME[(n[,m])]. Unrecognized names default to TEXT.
    fn parse_column_type(&mut self) -> Result<ColumnType> {
        let name = self.parse_identifier()?;

        let mut args = Vec::new();
        if self.match_token(TokenType::LParen) {
            loop {
                match &self.current().token_type {
                    TokenType::Number(n) if *n >= 0.0 && n.fract() == 0.0 => {
                        args.push(*n as u32);
                        self.advance();
                    }
                    _ => return Err(self.error("expected a size argument")),
                }
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
            self.expect(TokenType::RParen)?;
        }

        Ok(ColumnType::from_spec(&name, &args))
    }

    /// DROP [TABLE] name
    fn parse_drop(&mut self) -> Result<DropTableStmt> {
        self.expect(TokenType::Drop)?;
        self.match_token(TokenType::Table);
        let table = self.parse_identifier()?;
        Ok(DropTableStmt { table })
    }

    /// INSERT INTO name [(col, ...)] VALUES (expr, ...)
    fn parse_insert(&mut self) -> Result<InsertStmt> {
        self.expect(TokenType::Insert)?;
        self.expect(TokenType::Into)?;
        let table = self.parse_identifier()?;

        let mut columns = Vec::new();
        if self.match_token(TokenType::LParen) {
            loop {
                columns.push(self.parse_identifier()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
            self.expect(TokenType::RParen)?;
        }

        self.expect(TokenType::Values)?;
        self.expect(TokenType::LParen)?;
        let mut values = Vec::new();
        loop {
            values.push(self.parse_value_expr()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RParen)?;

        if !columns.is_empty() && columns.len() != values.len() {
            return Err(self.error(&format!(
                "INSERT has {} column(s) but {} value(s)",
                columns.len(),
                values.len()
            )));
        }

        Ok(InsertStmt {
            table,
            columns,
            values,
        })
    }

    /// UPDATE name SET col = expr, ... [WHERE ...]
    fn parse_update(&mut self) -> Result<UpdateStmt> {
        self.expect(TokenType::Update)?;
        let table = self.parse_identifier()?;
        self.expect(TokenType::Set)?;

        let mut assignments = Vec::new();
        loop {
            let column = self.parse_identifier()?;
            self.expect(TokenType::Eq)?;
            let value = self.parse_value_expr()?;
            assignments.push((column, value));
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        let where_clause = if self.match_token(TokenType::Where) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        Ok(UpdateStmt {
            table,
            assignments,
            where_clause,
        })
    }

    /// DELETE [FROM] name [WHERE ...]
    fn parse_delete(&mut self) -> Result<DeleteStmt> {
        self.expect(TokenType::Delete)?;
        self.match_token(TokenType::From);
        let table = self.parse_identifier()?;

        let where_clause = if self.match_token(TokenType::Where) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        Ok(DeleteStmt {
            table,
            where_clause,
        })
    }

    /// SELECT [DISTINCT] cols FROM name [WHERE ...] [ORDER BY col, ...]
    fn parse_select(&mut self) -> Result<SelectStmt> {
        self.expect(TokenType::Select)?;
        let distinct = self.match_token(TokenType::Distinct);
        let columns = self.parse_select_columns()?;

        self.expect(TokenType::From)?;
        let table = self.parse_identifier()?;

        // Single table only: anything but a recognized tail clause after the
        // table name is rejected here rather than mis-parsed.
        match self.current().token_type {
            TokenType::Join => return Err(self.error("JOIN is not supported")),
            TokenType::Comma | TokenType::Identifier(_) => {
                return Err(self.error("only one table may be referenced in FROM"))
            }
            _ => {}
        }

        let where_clause = if self.match_token(TokenType::Where) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        let mut order_by = Vec::new();
        if self.match_token(TokenType::Order) {
            self.expect(TokenType::By)?;
            loop {
                order_by.push(self.parse_identifier()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        Ok(SelectStmt {
            table,
            distinct,
            columns,
            where_clause,
            order_by,
        })
    }

    fn parse_select_columns(&mut self) -> Result<Vec<SelectColumn>> {
        let mut columns = Vec::new();

        loop {
            if self.match_token(TokenType::Star) {
                columns.push(SelectColumn::Star);
            } else {
                let name = self.parse_identifier()?;
                let item = if let Some(func) = AggregateFunc::from_name(&name) {
                    if matches!(self.current().token_type, TokenType::LParen) {
                        let call = self.parse_aggregate_args(func)?;
                        let alias = self.parse_alias()?;
                        SelectColumn::Aggregate { call, alias }
                    } else {
                        // Aggregate name used as a plain column name
                        let alias = self.parse_alias()?;
                        SelectColumn::Column { name, alias }
                    }
                } else {
                    let alias = self.parse_alias()?;
                    SelectColumn::Column { name, alias }
                };
                columns.push(item);
            }

            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        Ok(columns)
    }

    fn parse_alias(&mut self) -> Result<Option<String>> {
        if self.match_token(TokenType::As) {
            Ok(Some(self.parse_identifier()?))
        } else {
            Ok(None)
        }
    }

    /// Argument list of an aggregate call: `(*)` or `(column)`.
    fn parse_aggregate_args(&mut self, func: AggregateFunc) -> Result<AggregateCall> {
        self.expect(TokenType::LParen)?;
        let column = if self.match_token(TokenType::Star) {
            if func != AggregateFunc::Count {
                return Err(self.error(&format!("{}(*) is not supported", func.name())));
            }
            None
        } else {
            Some(self.parse_identifier()?)
        };
        self.expect(TokenType::RParen)?;
        Ok(AggregateCall { func, column })
    }

    /// Value expression for INSERT values and UPDATE assignments.
    fn parse_value_expr(&mut self) -> Result<ValueExpr> {
        match self.current().token_type.clone() {
            TokenType::Null => {
                self.advance();
                Ok(ValueExpr::Literal(Literal::Null))
            }
            TokenType::Number(n) => {
                self.advance();
                Ok(ValueExpr::Literal(Literal::Number(n)))
            }
            TokenType::String(s) => {
                self.advance();
                Ok(ValueExpr::Literal(Literal::Text(s)))
            }
            TokenType::Identifier(name) => {
                self.advance();
                if let Some(func) = AggregateFunc::from_name(&name) {
                    if matches!(self.current().token_type, TokenType::LParen) {
                        return Ok(ValueExpr::Aggregate(self.parse_aggregate_args(func)?));
                    }
                }
                Ok(ValueExpr::ColumnRef(name))
            }
            TokenType::Placeholder => Err(self.error("unbound parameter marker")),
            _ => Err(self.error("expected a value")),
        }
    }

    /// WHERE clause: comparisons joined by a single combinator. A clause
    /// mixing AND and OR is a syntax error, never silently re-interpreted.
    fn parse_condition(&mut self) -> Result<Condition> {
        let mut comparisons = vec![self.parse_comparison()?];
        let mut combinator: Option<Combinator> = None;

        loop {
            let next = match self.current().token_type {
                TokenType::And => Combinator::And,
                TokenType::Or => Combinator::Or,
                _ => break,
            };
            self.advance();

            match combinator {
                None => combinator = Some(next),
                Some(existing) if existing != next => {
                    return Err(self.error("cannot mix AND and OR in one WHERE clause"))
                }
                Some(_) => {}
            }

            comparisons.push(self.parse_comparison()?);
        }

        Ok(Condition {
            comparisons,
            combinator: combinator.unwrap_or(Combinator::And),
        })
    }

    fn parse_comparison(&mut self) -> Result<Comparison> {
        let column = self.parse_identifier()?;

        let predicate = match self.current().token_type.clone() {
            TokenType::Eq => {
                self.advance();
                Predicate::Compare {
                    op: CompareOp::Eq,
                    value: self.parse_literal()?,
                }
            }
            TokenType::Ne => {
                self.advance();
                Predicate::Compare {
                    op: CompareOp::Ne,
                    value: self.parse_literal()?,
                }
            }
            TokenType::Lt => {
                self.advance();
                Predicate::Compare {
                    op: CompareOp::Lt,
                    value: self.parse_literal()?,
                }
            }
            TokenType::Gt => {
                self.advance();
                Predicate::Compare {
                    op: CompareOp::Gt,
                    value: self.parse_literal()?,
                }
            }
            TokenType::Like => {
                self.advance();
                let pattern = match self.current().token_type.clone() {
                    TokenType::String(s) => s,
                    TokenType::Identifier(s) => s,
                    _ => return Err(self.error("expected a LIKE pattern")),
                };
                self.advance();
                Predicate::Like { pattern }
            }
            TokenType::In => {
                self.advance();
                self.expect(TokenType::LParen)?;
                let mut values = Vec::new();
                loop {
                    values.push(self.parse_literal()?);
                    if !self.match_token(TokenType::Comma) {
                        break;
                    }
                }
                self.expect(TokenType::RParen)?;
                Predicate::In { values }
            }
            _ => return Err(self.error("expected a comparison operator")),
        };

        Ok(Comparison { column, predicate })
    }

    /// Literal operand on the right-hand side of a comparison. A bare
    /// identifier is taken as its own text, preserving multi-token
    /// right-hand sides whole.
    fn parse_literal(&mut self) -> Result<Literal> {
        let literal = match self.current().token_type.clone() {
            TokenType::Null => Literal::Null,
            TokenType::Number(n) => Literal::Number(n),
            TokenType::String(s) => Literal::Text(s),
            TokenType::Identifier(s) => Literal::Text(s),
            TokenType::Placeholder => return Err(self.error("unbound parameter marker")),
            _ => return Err(self.error("expected a literal value")),
        };
        self.advance();
        Ok(literal)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.current().token_type == token_type {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType) -> Result<()> {
        if self.match_token(token_type.clone()) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {:?}", token_type)))
        }
    }

    fn parse_identifier(&mut self) -> Result<String> {
        match self.current().token_type.clone() {
            TokenType::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("expected an identifier")),
        }
    }

    fn error(&self, message: &str) -> DbError {
        DbError::Syntax(format!(
            "{} (at position {})",
            message,
            self.current().column
        ))
    }
}

/// Tokenize and parse one statement.
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let tokens = super::lexer::Lexer::new(sql).tokenize()?;
    Parser::new(tokens).parse()
}
