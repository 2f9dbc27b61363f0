use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/*
Tokens are individual atoms in the molecule that is a programming language. Each lexeme the
lexer recognises maps to exactly one of the kinds below. Two-character operators (`==`, `!=`)
get their own kind rather than being represented as two `Bang`/`Assign` tokens in a row -
that lookahead happens once, in the lexer, so nothing downstream has to re-discover it.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Illegal,
    Eof,

    // identifiers + literals
    Id,
    Number,
    String,

    // operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Less,
    Greater,
    Equal,
    NotEqual,

    // delimiters
    Comma,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("function", TokenType::Function);
    m.insert("let", TokenType::Let);
    m.insert("true", TokenType::True);
    m.insert("false", TokenType::False);
    m.insert("if", TokenType::If);
    m.insert("else", TokenType::Else);
    m.insert("return", TokenType::Return);
    m
});

/// Resolve an identifier-shaped lexeme to a keyword kind, or `Id` if it isn't one.
/// Note there is no `fn` alias here - the table only ever registers `function`.
pub fn lookup_identifier(ident: &str) -> TokenType {
    KEYWORDS.get(ident).copied().unwrap_or(TokenType::Id)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
    pub line: usize,
}

impl Token {
    pub fn new(token_type: TokenType, literal: impl Into<String>, line: usize) -> Self {
        Self {
            token_type,
            literal: literal.into(),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({:?})", self.token_type, self.literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_does_not_contain_fn_alias() {
        assert_eq!(lookup_identifier("fn"), TokenType::Id);
        assert_eq!(lookup_identifier("function"), TokenType::Function);
    }

    #[test]
    fn unknown_identifier_resolves_to_id() {
        assert_eq!(lookup_identifier("foobar"), TokenType::Id);
    }
}
