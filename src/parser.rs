use miette::Diagnostic;
use thiserror::Error;

use crate::ast::{Block, Expr, InfixOp, PrefixOp, Program, Stmt};
use crate::lexer::{Lexer, Token, TokenKind};

/// A structural violation in the token stream. The first one aborts the
/// parse; there is no recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("invalid syntax. Expected {expected:?} but got {got:?}")]
    UnexpectedToken { expected: String, got: String },

    #[error("invalid syntax. Expected end of statement but got {got:?}")]
    #[diagnostic(help(
        "a declaration or return ends at a newline, a closing brace, or the end of input"
    ))]
    UnterminatedStatement { got: String },

    #[error("invalid syntax. Unexpected token {got:?} in expression")]
    UnexpectedExpressionToken { got: String },

    #[error("invalid syntax. {got:?} is not an infix operator")]
    InvalidInfixOperator { got: String },

    #[error("integer literal {literal:?} does not fit in 64 bits")]
    IntegerOutOfRange { literal: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Equal | TokenKind::NotEqual => Precedence::Equals,
        TokenKind::Less | TokenKind::Greater => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Star | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Pratt parser with two tokens of lookahead.
///
/// Cursor discipline: every `parse_*` helper leaves `current` on the last
/// token of whatever it just parsed, so callers decide from `peek` whether
/// to keep climbing.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let mut parser = Self {
            lexer,
            current: Token::new(TokenKind::Eof, ""),
            peek: Token::new(TokenKind::Eof, ""),
        };
        parser.advance();
        parser.advance();
        parser
    }

    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();

        loop {
            while self.current.kind == TokenKind::Newline {
                self.advance();
            }
            if self.current.kind == TokenKind::Eof {
                break;
            }
            statements.push(self.parse_statement()?);
            self.advance();
        }

        Ok(Program::new(statements))
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current.kind {
            TokenKind::Var => self.parse_declaration(),
            TokenKind::Return => self.parse_return(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        self.expect_peek(TokenKind::Identifier)?;
        let name = self.current.literal.clone();

        self.expect_peek(TokenKind::Assign)?;
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.end_statement()?;

        Ok(Stmt::Declare { name, value })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.end_statement()?;

        Ok(Stmt::Return { value })
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek.kind == TokenKind::Newline {
            self.advance();
        }

        Ok(Stmt::Expression { value })
    }

    // A declaration or return must terminate the statement; a closing brace
    // or end of input counts so the last line of a block needs no newline.
    fn end_statement(&mut self) -> Result<(), ParseError> {
        match self.peek.kind {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RBrace => Ok(()),
            got => Err(ParseError::UnterminatedStatement {
                got: got.to_string(),
            }),
        }
    }

    fn parse_expression(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        let mut left = self.parse_prefix()?;

        while self.peek.kind != TokenKind::Newline && min < precedence_of(self.peek.kind) {
            self.advance();
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        match self.current.kind {
            TokenKind::Identifier => Ok(Expr::Identifier(self.current.literal.clone())),
            TokenKind::Integer => {
                let literal = self.current.literal.clone();
                let value = literal
                    .parse::<i64>()
                    .map_err(|_| ParseError::IntegerOutOfRange { literal })?;
                Ok(Expr::Integer(value))
            }
            TokenKind::Str => Ok(Expr::String(self.current.literal.clone())),
            TokenKind::True => Ok(Expr::Boolean(true)),
            TokenKind::False => Ok(Expr::Boolean(false)),
            TokenKind::Minus => self.parse_prefix_operator(PrefixOp::Negate),
            TokenKind::Bang => self.parse_prefix_operator(PrefixOp::Not),
            TokenKind::LParen => self.parse_grouped(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            got => Err(ParseError::UnexpectedExpressionToken {
                got: got.to_string(),
            }),
        }
    }

    fn parse_prefix_operator(&mut self, op: PrefixOp) -> Result<Expr, ParseError> {
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Ok(Expr::Prefix {
            op,
            right: Box::new(right),
        })
    }

    fn parse_grouped(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if_expression(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;

        let otherwise = if self.peek.kind == TokenKind::Else {
            self.advance();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expr::If {
            condition: Box::new(condition),
            consequence,
            otherwise,
        })
    }

    fn parse_function_literal(&mut self) -> Result<Expr, ParseError> {
        self.expect_peek(TokenKind::LParen)?;

        let mut parameters = Vec::new();
        while self.peek.kind != TokenKind::RParen {
            if self.peek.kind == TokenKind::Comma {
                self.advance();
                continue;
            }
            self.expect_peek(TokenKind::Identifier)?;
            parameters.push(self.current.literal.clone());
        }
        self.advance();

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Expr::Function { parameters, body })
    }

    fn parse_infix(&mut self, left: Expr) -> Result<Expr, ParseError> {
        if self.current.kind == TokenKind::LParen {
            return self.parse_call(left);
        }

        let op = match self.current.kind {
            TokenKind::Plus => InfixOp::Plus,
            TokenKind::Minus => InfixOp::Minus,
            TokenKind::Star => InfixOp::Star,
            TokenKind::Slash => InfixOp::Slash,
            TokenKind::Less => InfixOp::Less,
            TokenKind::Greater => InfixOp::Greater,
            TokenKind::Equal => InfixOp::Equal,
            TokenKind::NotEqual => InfixOp::NotEqual,
            got => {
                return Err(ParseError::InvalidInfixOperator {
                    got: got.to_string(),
                });
            }
        };

        let precedence = precedence_of(self.current.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;

        Ok(Expr::Infix {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_call(&mut self, function: Expr) -> Result<Expr, ParseError> {
        let mut arguments = Vec::new();

        self.skip_peek_newlines();
        if self.peek.kind == TokenKind::RParen {
            self.advance();
            return Ok(Expr::Call {
                function: Box::new(function),
                arguments,
            });
        }

        loop {
            self.skip_peek_newlines();
            self.advance();
            arguments.push(self.parse_expression(Precedence::Lowest)?);

            if self.peek.kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }

        self.skip_peek_newlines();
        self.expect_peek(TokenKind::RParen)?;

        Ok(Expr::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut statements = Vec::new();

        self.advance();
        loop {
            while self.current.kind == TokenKind::Newline {
                self.advance();
            }
            if matches!(self.current.kind, TokenKind::RBrace | TokenKind::Eof) {
                break;
            }
            statements.push(self.parse_statement()?);
            self.advance();
        }

        Ok(Block { statements })
    }

    fn expect_peek(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if self.peek.kind == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                got: self.peek.kind.to_string(),
            })
        }
    }

    fn skip_peek_newlines(&mut self) {
        while self.peek.kind == TokenKind::Newline {
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }
}
