use crate::evaluator::value::Value;

/// Consulted by `Identifier` lookup whenever a name misses the environment chain - a builtin
/// never shadows a user binding, since the environment is always checked first.
pub fn lookup(name: &str) -> Option<Value> {
    match name {
        "len" => Some(Value::Builtin(len)),
        "push" => Some(Value::Builtin(push)),
        _ => None,
    }
}

fn wrong_arity(got: usize, want: usize) -> Value {
    Value::Error(format!("wrong number of arguments. got={}, want={}", got, want))
}

fn len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        other => Value::Error(format!(
            "argument to `len` not supported, got {}",
            other.type_tag()
        )),
    }
}

fn push(args: &[Value]) -> Value {
    if args.len() != 2 {
        return wrong_arity(args.len(), 2);
    }
    match &args[0] {
        Value::Array(elements) => {
            let mut new_elements = elements.clone();
            new_elements.push(args[1].clone());
            Value::Array(new_elements)
        }
        other => Value::Error(format!(
            "argument to push must be ARRAY, got {}",
            other.type_tag()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Value {
        match lookup(name).expect("builtin registered") {
            Value::Builtin(f) => f(args),
            _ => unreachable!(),
        }
    }

    #[test]
    fn len_reports_string_byte_length() {
        match call("len", &[Value::String("hello world".to_string())]) {
            Value::Integer(n) => assert_eq!(n, 11),
            other => panic!("expected integer, got {:?}", other),
        }
    }

    #[test]
    fn len_reports_array_element_count() {
        match call("len", &[Value::Array(vec![Value::Integer(1), Value::Integer(2)])]) {
            Value::Integer(n) => assert_eq!(n, 2),
            other => panic!("expected integer, got {:?}", other),
        }
    }

    #[test]
    fn len_rejects_unsupported_types() {
        match call("len", &[Value::Integer(1)]) {
            Value::Error(message) => {
                assert_eq!(message, "argument to `len` not supported, got INTEGER")
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn len_rejects_wrong_arity() {
        match call("len", &[Value::Integer(1), Value::Integer(2)]) {
            Value::Error(message) => assert_eq!(message, "wrong number of arguments. got=2, want=1"),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn push_returns_new_array_leaving_original_untouched() {
        let original = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
        let result = call("push", &[original.clone(), Value::Integer(3)]);

        match (&original, &result) {
            (Value::Array(before), Value::Array(after)) => {
                assert_eq!(before.len(), 2);
                assert_eq!(after.len(), 3);
            }
            _ => panic!("expected arrays"),
        }
    }

    #[test]
    fn push_rejects_non_array_first_argument() {
        match call("push", &[Value::Integer(1), Value::Integer(2)]) {
            Value::Error(message) => assert_eq!(message, "argument to push must be ARRAY, got INTEGER"),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_name_is_not_a_builtin() {
        assert!(lookup("nope").is_none());
    }
}
