use std::fmt;
use std::rc::Rc;

use crate::environment::Environment;
use crate::parser::{Identifier, Statement};

/// A native function backing a builtin table entry; see `evaluator::builtins`.
pub type BuiltinFn = fn(&[Value]) -> Value;

/*
`Value` is the tagged union every expression evaluates to. There is no virtual dispatch here:
the evaluator's `match` on this enum is exhaustive and the compiler enforces that every new
variant gets handled everywhere. `Boolean` and `Null` double as the "canonical singleton"
values the data model talks about - Rust's structural matching on a fieldless variant already
gives identity-equal-to-value-equal behavior for free, so there is no allocate-once table to
maintain separately.
*/
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Value>),
    Null,
    /// Marks a value mid-unwind from a `return`; unwrapped at function-call boundaries and
    /// by the top-level program evaluator. Never appears nested inside another `ReturnValue`.
    ReturnValue(Box<Value>),
    Error(String),
    Function {
        parameters: Vec<Identifier>,
        body: Rc<Statement>,
        env: Rc<Environment>,
    },
    Builtin(BuiltinFn),
}

impl Value {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Null => "NULL",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Function { .. } => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
        }
    }

    /// `null` and `false` are falsy; everything else, including `0` and `""`, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(value) => value.to_string(),
            Value::Boolean(value) => value.to_string(),
            Value::String(value) => value.clone(),
            Value::Array(elements) => format!(
                "[{}]",
                elements
                    .iter()
                    .map(Value::inspect)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Value::Null => "null".to_string(),
            Value::ReturnValue(inner) => inner.inspect(),
            Value::Error(message) => format!("ERROR :{}", message),
            Value::Function {
                parameters, body, ..
            } => {
                let params = parameters
                    .iter()
                    .map(Identifier::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("function({}) {{\n{}\n}}", params, body)
            }
            Value::Builtin(_) => "builtin function".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_matches_null_and_false_only() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
        assert!(Value::Array(Vec::new()).is_truthy());
    }

    #[test]
    fn inspect_formats_each_variant() {
        assert_eq!(Value::Integer(5).inspect(), "5");
        assert_eq!(Value::Boolean(true).inspect(), "true");
        assert_eq!(Value::Null.inspect(), "null");
        assert_eq!(Value::String("hi".to_string()).inspect(), "hi");
        assert_eq!(
            Value::Array(vec![Value::Integer(1), Value::Integer(2)]).inspect(),
            "[1, 2]"
        );
        assert_eq!(
            Value::Error("identifier not found : x".to_string()).inspect(),
            "ERROR :identifier not found : x"
        );
    }

    #[test]
    fn type_tags_are_human_readable() {
        assert_eq!(Value::Integer(1).type_tag(), "INTEGER");
        assert_eq!(Value::Array(Vec::new()).type_tag(), "ARRAY");
        assert_eq!(Value::Null.type_tag(), "NULL");
    }
}
