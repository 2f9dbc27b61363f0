use std::fmt;

use crate::token::Token;

/*
Two disjoint node families make up the tree: statements, which have no value of their own,
and expressions, which do. Both carry the token that introduced them so `token_literal()`
is free; both implement `Display`, which re-emits source-equivalent text. Tests lean on the
`Display` output (not the tree shape) to check precedence and associativity - two trees that
print the same are considered equivalent.
*/

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let name = token.literal.clone();
        Self { token, name }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Expression,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
    Block {
        token: Token,
        statements: Vec<Statement>,
    },
}

impl Statement {
    pub fn token_literal(&self) -> &str {
        match self {
            Statement::Let { token, .. }
            | Statement::Return { token, .. }
            | Statement::Expression { token, .. }
            | Statement::Block { token, .. } => &token.literal,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "let {} = {};", name, value),
            Statement::Return { value, .. } => write!(f, "return {};", value),
            Statement::Expression { expression, .. } => write!(f, "{}", expression),
            Statement::Block { statements, .. } => {
                for statement in statements {
                    write!(f, "{}", statement)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    NumberLiteral {
        token: Token,
        value: i64,
    },
    StringLiteral {
        token: Token,
        value: String,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    ArrayLiteral {
        token: Token,
        elements: Vec<Expression>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: Box<Statement>,
        alternative: Option<Box<Statement>>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        body: Box<Statement>,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    pub fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(ident) => &ident.token.literal,
            Expression::NumberLiteral { token, .. }
            | Expression::StringLiteral { token, .. }
            | Expression::Boolean { token, .. }
            | Expression::ArrayLiteral { token, .. }
            | Expression::Index { token, .. }
            | Expression::Prefix { token, .. }
            | Expression::Infix { token, .. }
            | Expression::If { token, .. }
            | Expression::FunctionLiteral { token, .. }
            | Expression::Call { token, .. } => &token.literal,
        }
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::NumberLiteral { value, .. } => write!(f, "{}", value),
            Expression::StringLiteral { value, .. } => write!(f, "{}", value),
            Expression::Boolean { value, .. } => write!(f, "{}", value),
            Expression::ArrayLiteral { elements, .. } => {
                write!(f, "[{}]", join_display(elements))
            }
            Expression::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
            Expression::Prefix { operator, right, .. } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral {
                token,
                parameters,
                body,
            } => write!(
                f,
                "{}({}) {}",
                token.literal,
                join_display(parameters),
                body
            ),
            Expression::Call {
                function,
                arguments,
                ..
            } => write!(f, "{}({})", function, join_display(arguments)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(Statement::token_literal)
            .unwrap_or("")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    #[test]
    fn let_statement_prints_source_equivalent_text() {
        let program = Program {
            statements: vec![Statement::Let {
                token: Token::new(TokenType::Let, "let", 1),
                name: Identifier::new(Token::new(TokenType::Id, "myVar", 1)),
                value: Expression::Identifier(Identifier::new(Token::new(
                    TokenType::Id,
                    "anotherVar",
                    1,
                ))),
            }],
        };

        assert_eq!(program.to_string(), "let myVar = anotherVar;");
    }
}
