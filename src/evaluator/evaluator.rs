use std::rc::Rc;

use log::{debug, trace};

use crate::environment::Environment;
use crate::evaluator::builtins;
use crate::evaluator::value::Value;
use crate::parser::{Expression, Program, Statement};

/*
A single recursive function per node family, dispatching on the AST variant with an exhaustive
`match` rather than a trait object per node - the tagged-union style the rest of this crate
uses for `Value` too. `Program` and `Block` share almost identical short-circuit rules (stop at
the first `Error`, stop at the first `ReturnValue`) but differ in one place: `Program` unwraps
the `ReturnValue` before returning it to the caller, `Block` does not, so a `return` nested
inside an `if` inside a function body keeps unwinding until it reaches the call boundary that
actually owns it (see `apply_function`) instead of stopping at the first enclosing block.
*/

pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;
    for statement in &program.statements {
        result = eval_statement(statement, env);
        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }
    result
}

fn eval_block_statement(statements: &[Statement], env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;
    for statement in statements {
        result = eval_statement(statement, env);
        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
    }
    result
}

pub fn eval_statement(statement: &Statement, env: &Rc<Environment>) -> Value {
    match statement {
        Statement::Let { name, value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            env.set(name.name.clone(), value);
            Value::Null
        }
        Statement::Return { value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            Value::ReturnValue(Box::new(value))
        }
        Statement::Expression { expression, .. } => eval_expression(expression, env),
        Statement::Block { statements, .. } => eval_block_statement(statements, env),
    }
}

pub fn eval_expression(expression: &Expression, env: &Rc<Environment>) -> Value {
    match expression {
        Expression::Identifier(identifier) => eval_identifier(&identifier.name, env),
        Expression::NumberLiteral { value, .. } => Value::Integer(*value),
        Expression::StringLiteral { value, .. } => Value::String(value.clone()),
        Expression::Boolean { value, .. } => Value::Boolean(*value),
        Expression::ArrayLiteral { elements, .. } => match eval_expressions(elements, env) {
            Ok(elements) => Value::Array(elements),
            Err(error) => error,
        },
        Expression::Index { left, index, .. } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
        Expression::Prefix { operator, right, .. } => {
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(operator, right)
        }
        Expression::Infix {
            left,
            operator,
            right,
            ..
        } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(operator, left, right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => eval_if_expression(condition, consequence, alternative.as_deref(), env),
        Expression::FunctionLiteral {
            parameters, body, ..
        } => Value::Function {
            parameters: parameters.clone(),
            body: Rc::new((**body).clone()),
            env: Rc::clone(env),
        },
        Expression::Call {
            function,
            arguments,
            ..
        } => {
            let function = eval_expression(function, env);
            if function.is_error() {
                return function;
            }
            match eval_expressions(arguments, env) {
                Ok(arguments) => apply_function(function, arguments),
                Err(error) => error,
            }
        }
    }
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Value {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name) {
        return builtin;
    }
    trace!("identifier not found: {}", name);
    Value::Error(format!("identifier not found : {}", name))
}

/// Evaluates a comma-separated list left-to-right, stopping at the first `Error` - used by
/// array literals and call arguments alike so a later element's error never overwrites one
/// an earlier element already produced.
fn eval_expressions(expressions: &[Expression], env: &Rc<Environment>) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let value = eval_expression(expression, env);
        if value.is_error() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => Value::Boolean(!right.is_truthy()),
        "-" => match right {
            Value::Integer(value) => Value::Integer(value.wrapping_neg()),
            other => Value::Error(format!("unknown operator : -{}", other.type_tag())),
        },
        other_operator => Value::Error(format!(
            "unknown operator: {}{}",
            other_operator,
            right.type_tag()
        )),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix_expression(operator, l, r),
        _ if operator == "==" => Value::Boolean(identity_equal(&left, &right)),
        _ if operator == "!=" => Value::Boolean(!identity_equal(&left, &right)),
        _ if left.type_tag() != right.type_tag() => Value::Error(format!(
            "type mismatch : {} {} {}",
            left.type_tag(),
            operator,
            right.type_tag()
        )),
        _ => Value::Error(format!(
            "unknown operator : {} {} {}",
            left.type_tag(),
            operator,
            right.type_tag()
        )),
    }
}

/// Identity equality on the canonical `Boolean`/`Null` values - the only case this ever
/// compares equal is two booleans of the same value, or `Null` against `Null`. A mixed
/// `Integer`/`Boolean` comparison always falls through to `false`.
fn identity_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left.wrapping_add(right)),
        "-" => Value::Integer(left.wrapping_sub(right)),
        "*" => Value::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(left / right)
            }
        }
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        _ => Value::Error(format!("unknown operator : INTEGER {} INTEGER", operator)),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::String(format!("{}{}", left, right)),
        _ => Value::Error(format!("unknown operator : STRING {} STRING", operator)),
    }
}

fn eval_index_expression(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(elements), Value::Integer(i)) => {
            if *i < 0 || *i as usize >= elements.len() {
                Value::Null
            } else {
                elements[*i as usize].clone()
            }
        }
        _ => Value::Error(format!("index operator not supported : {}", left.type_tag())),
    }
}

fn eval_if_expression(
    condition: &Expression,
    consequence: &Statement,
    alternative: Option<&Statement>,
    env: &Rc<Environment>,
) -> Value {
    let condition = eval_expression(condition, env);
    if condition.is_error() {
        return condition;
    }

    if condition.is_truthy() {
        eval_statement(consequence, env)
    } else if let Some(alternative) = alternative {
        eval_statement(alternative, env)
    } else {
        Value::Null
    }
}

fn apply_function(function: Value, arguments: Vec<Value>) -> Value {
    match function {
        Value::Function {
            parameters,
            body,
            env,
        } => {
            if parameters.len() != arguments.len() {
                return Value::Error(format!(
                    "wrong number of arguments. got={}, want={}",
                    arguments.len(),
                    parameters.len()
                ));
            }

            let call_env = Environment::new_enclosed(&env);
            for (parameter, argument) in parameters.iter().zip(arguments) {
                call_env.set(parameter.name.clone(), argument);
            }

            debug!("calling function with {} parameter(s)", parameters.len());
            match eval_statement(&body, &call_env) {
                Value::ReturnValue(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(builtin) => builtin(&arguments),
        other => Value::Error(format!("not a function : {}", other.type_tag())),
    }
}
