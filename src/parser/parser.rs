use std::collections::HashMap;

use log::debug;

use crate::lexer::Lexer;
use crate::parser::ast::{Expression, Identifier, Program, Statement};
use crate::token::{Token, TokenType};

/*
Operator precedence parsing (a "Pratt parser") dispatches on the current token through two
tables: one for tokens that can start an expression (`prefix_parse_fns`), one for tokens that
continue an expression already parsed so far (`infix_parse_fns`). The main loop in
`parse_expression` is the whole algorithm: parse a prefix, then keep extending it leftward for
as long as the next token binds tighter than the precedence the caller asked for.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn precedence_of(token_type: TokenType) -> Precedence {
    match token_type {
        TokenType::Equal | TokenType::NotEqual => Precedence::Equals,
        TokenType::Less | TokenType::Greater => Precedence::LessGreater,
        TokenType::Plus | TokenType::Minus => Precedence::Sum,
        TokenType::Slash | TokenType::Asterisk => Precedence::Product,
        TokenType::LParen => Precedence::Call,
        TokenType::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

type PrefixParseFn = fn(&mut Parser) -> Option<Expression>;
type InfixParseFn = fn(&mut Parser, Expression) -> Option<Expression>;

pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token,
    errors: Vec<String>,
    prefix_parse_fns: HashMap<TokenType, PrefixParseFn>,
    infix_parse_fns: HashMap<TokenType, InfixParseFn>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        let mut parser = Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
        };

        parser.register_prefix(TokenType::Id, Parser::parse_identifier);
        parser.register_prefix(TokenType::Number, Parser::parse_number_literal);
        parser.register_prefix(TokenType::String, Parser::parse_string_literal);
        parser.register_prefix(TokenType::True, Parser::parse_boolean);
        parser.register_prefix(TokenType::False, Parser::parse_boolean);
        parser.register_prefix(TokenType::Bang, Parser::parse_prefix_expression);
        parser.register_prefix(TokenType::Minus, Parser::parse_prefix_expression);
        parser.register_prefix(TokenType::LParen, Parser::parse_grouped_expression);
        parser.register_prefix(TokenType::LBracket, Parser::parse_array_literal);
        parser.register_prefix(TokenType::If, Parser::parse_if_expression);
        parser.register_prefix(TokenType::Function, Parser::parse_function_literal);

        parser.register_infix(TokenType::Plus, Parser::parse_infix_expression);
        parser.register_infix(TokenType::Minus, Parser::parse_infix_expression);
        parser.register_infix(TokenType::Slash, Parser::parse_infix_expression);
        parser.register_infix(TokenType::Asterisk, Parser::parse_infix_expression);
        parser.register_infix(TokenType::Equal, Parser::parse_infix_expression);
        parser.register_infix(TokenType::NotEqual, Parser::parse_infix_expression);
        parser.register_infix(TokenType::Less, Parser::parse_infix_expression);
        parser.register_infix(TokenType::Greater, Parser::parse_infix_expression);
        parser.register_infix(TokenType::LParen, Parser::parse_call_expression);
        parser.register_infix(TokenType::LBracket, Parser::parse_index_expression);

        parser
    }

    fn register_prefix(&mut self, token_type: TokenType, f: PrefixParseFn) {
        self.prefix_parse_fns.insert(token_type, f);
    }

    fn register_infix(&mut self, token_type: TokenType, f: InfixParseFn) {
        self.infix_parse_fns.insert(token_type, f);
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn next_token(&mut self) {
        std::mem::swap(&mut self.current, &mut self.peek);
        self.peek = self.lexer.next_token();
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while self.current.token_type != TokenType::Eof {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        debug!("parsed program with {} statement(s)", statements.len());
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.token_type {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::Id) {
            return None;
        }
        let name = Identifier::new(self.current.clone());

        if !self.expect_peek(TokenType::Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::SemiColon) {
            self.next_token();
        }

        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::SemiColon) {
            self.next_token();
        }

        Some(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::SemiColon) {
            self.next_token();
        }

        Some(Statement::Expression { token, expression })
    }

    fn parse_block_statement(&mut self) -> Statement {
        let token = self.current.clone();
        let mut statements = Vec::new();

        self.next_token();
        while !self.current_token_is(TokenType::RBrace) && !self.current_token_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        Statement::Block { token, statements }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = self.prefix_parse_fns.get(&self.current.token_type).copied();
        let Some(prefix) = prefix else {
            self.errors.push(format!(
                "line {}: no prefix parse function for {:?}",
                self.current.line, self.current.token_type
            ));
            return None;
        };

        let mut left = prefix(self)?;

        while !self.peek_token_is(TokenType::SemiColon) && precedence < self.peek_precedence() {
            let infix = self.infix_parse_fns.get(&self.peek.token_type).copied();
            let Some(infix) = infix else {
                return Some(left);
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(parser: &mut Parser) -> Option<Expression> {
        Some(Expression::Identifier(Identifier::new(parser.current.clone())))
    }

    fn parse_number_literal(parser: &mut Parser) -> Option<Expression> {
        let token = parser.current.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::NumberLiteral { token, value }),
            Err(_) => {
                parser.errors.push(format!(
                    "line {}: could not parse \"{}\" as number",
                    token.line, token.literal
                ));
                None
            }
        }
    }

    fn parse_string_literal(parser: &mut Parser) -> Option<Expression> {
        let token = parser.current.clone();
        let value = token.literal.clone();
        Some(Expression::StringLiteral { token, value })
    }

    fn parse_boolean(parser: &mut Parser) -> Option<Expression> {
        let token = parser.current.clone();
        let value = token.token_type == TokenType::True;
        Some(Expression::Boolean { token, value })
    }

    fn parse_prefix_expression(parser: &mut Parser) -> Option<Expression> {
        let token = parser.current.clone();
        let operator = token.literal.clone();

        parser.next_token();
        let right = parser.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(parser: &mut Parser) -> Option<Expression> {
        parser.next_token();
        let expression = parser.parse_expression(Precedence::Lowest)?;

        if !parser.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(expression)
    }

    fn parse_array_literal(parser: &mut Parser) -> Option<Expression> {
        let token = parser.current.clone();
        let elements = parser.parse_expression_list(TokenType::RBracket)?;
        Some(Expression::ArrayLiteral { token, elements })
    }

    fn parse_if_expression(parser: &mut Parser) -> Option<Expression> {
        let token = parser.current.clone();

        if !parser.expect_peek(TokenType::LParen) {
            return None;
        }
        parser.next_token();
        let condition = parser.parse_expression(Precedence::Lowest)?;

        if !parser.expect_peek(TokenType::RParen) {
            return None;
        }
        if !parser.expect_peek(TokenType::LBrace) {
            return None;
        }
        let consequence = Box::new(parser.parse_block_statement());

        let alternative = if parser.peek_token_is(TokenType::Else) {
            parser.next_token();
            if !parser.expect_peek(TokenType::LBrace) {
                return None;
            }
            Some(Box::new(parser.parse_block_statement()))
        } else {
            None
        };

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(parser: &mut Parser) -> Option<Expression> {
        let token = parser.current.clone();

        if !parser.expect_peek(TokenType::LParen) {
            return None;
        }
        let parameters = parser.parse_function_parameters()?;

        if !parser.expect_peek(TokenType::LBrace) {
            return None;
        }
        let body = Box::new(parser.parse_block_statement());

        Some(Expression::FunctionLiteral {
            token,
            parameters,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_token_is(TokenType::RParen) {
            self.next_token();
            return Some(parameters);
        }

        self.next_token();
        parameters.push(Identifier::new(self.current.clone()));

        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            parameters.push(Identifier::new(self.current.clone()));
        }

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(parameters)
    }

    fn parse_infix_expression(parser: &mut Parser, left: Expression) -> Option<Expression> {
        let token = parser.current.clone();
        let operator = token.literal.clone();
        let precedence = precedence_of(parser.current.token_type);

        parser.next_token();
        let right = parser.parse_expression(precedence)?;

        Some(Expression::Infix {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_call_expression(parser: &mut Parser, function: Expression) -> Option<Expression> {
        let token = parser.current.clone();
        let arguments = parser.parse_expression_list(TokenType::RParen)?;
        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(parser: &mut Parser, left: Expression) -> Option<Expression> {
        let token = parser.current.clone();
        parser.next_token();
        let index = parser.parse_expression(Precedence::Lowest)?;

        if !parser.expect_peek(TokenType::RBracket) {
            return None;
        }

        Some(Expression::Index {
            token,
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_token_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn current_token_is(&self, token_type: TokenType) -> bool {
        self.current.token_type == token_type
    }

    fn peek_token_is(&self, token_type: TokenType) -> bool {
        self.peek.token_type == token_type
    }

    fn expect_peek(&mut self, token_type: TokenType) -> bool {
        if self.peek_token_is(token_type) {
            self.next_token();
            true
        } else {
            self.peek_error(token_type);
            false
        }
    }

    fn peek_error(&mut self, token_type: TokenType) {
        self.errors.push(format!(
            "line {}: next token expected : {:?}, but was actual : {:?}",
            self.peek.line, token_type, self.peek.token_type
        ));
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.token_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> (Program, Vec<String>) {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer);
        let program = parser.parse_program();
        (program, parser.errors().to_vec())
    }

    #[test]
    fn parses_let_statements() {
        let (program, errors) = parse("let x = 5; let y = 10; let foobar = 838383;");
        assert!(errors.is_empty(), "unexpected parser errors: {:?}", errors);
        assert_eq!(program.statements.len(), 3);
        assert_eq!(program.to_string(), "let x = 5;let y = 10;let foobar = 838383;");
    }

    #[test]
    fn records_error_for_missing_assign_token() {
        let (_, errors) = parse("let x 5;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("next token expected"));
    }

    #[test]
    fn parses_return_statements() {
        let (program, errors) = parse("return 5; return add(15);");
        assert!(errors.is_empty());
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn operator_precedence_round_trips_through_display() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a + b * c", "(a + (b * c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        for (input, expected) in cases {
            let (program, errors) = parse(input);
            assert!(errors.is_empty(), "input {:?}: errors {:?}", input, errors);
            assert_eq!(program.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn parses_if_else_expression() {
        let (program, errors) = parse("if (x < y) { x } else { y }");
        assert!(errors.is_empty());
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn parses_function_literal_with_parameters() {
        let (program, errors) = parse("function(x, y) { x + y; }");
        assert!(errors.is_empty());
        match &program.statements[0] {
            Statement::Expression {
                expression: Expression::FunctionLiteral { parameters, .. },
                ..
            } => assert_eq!(parameters.len(), 2),
            other => panic!("expected function literal statement, got {:?}", other),
        }
    }

    #[test]
    fn number_literal_overflow_is_reported() {
        let (_, errors) = parse("99999999999999999999999999;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("could not parse"));
    }

    #[test]
    fn reports_missing_prefix_parse_function() {
        let (_, errors) = parse(")");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no prefix parse function"));
    }

    #[test]
    fn trailing_semicolon_before_closing_brace_is_optional() {
        let (program, errors) = parse("function() { 5 }");
        assert!(errors.is_empty(), "unexpected parser errors: {:?}", errors);
        assert_eq!(program.statements.len(), 1);
    }
}
