use std::fmt;

use crate::ast::{Block, Expr, InfixOp, PrefixOp, Program, Stmt};
use crate::environment::Environment;

/// The two canonical booleans. Boolean equality and `if` dispatch compare
/// against these, so every boolean in the system is one of them.
pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Function(FunctionValue),
    /// Internal trampoline wrapper; unwrapped at function and program
    /// boundaries, never shown to the user.
    Return(Box<Value>),
    Error(String),
    Nothing,
}

#[derive(Debug, Clone)]
pub struct FunctionValue {
    pub parameters: Vec<String>,
    pub body: Block,
    pub env: Environment,
}

impl Value {
    /// Type tag used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Function(_) => "FUNCTION",
            Value::Return(_) => "RETURN",
            Value::Error(_) => "ERROR",
            Value::Nothing => "NOTHING",
        }
    }

    fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Nothing, Value::Nothing) => true,
            _ => false,
        }
    }
}

/// The inspection form: the only externally observable output of the core.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
            Value::Function(_) => f.write_str("FUNCTION"),
            Value::Return(inner) => write!(f, "{inner}"),
            Value::Error(message) => write!(f, "ERROR: {message}"),
            Value::Nothing => f.write_str("nothing"),
        }
    }
}

fn bool_value(value: bool) -> Value {
    if value {
        TRUE
    } else {
        FALSE
    }
}

/// Walks a program and produces its result value. `Return` is unwrapped
/// here; an `Error` aborts the walk and becomes the result.
pub fn eval(program: &Program, env: &mut Environment) -> Value {
    let mut result = Value::Nothing;

    for stmt in &program.statements {
        match eval_stmt(stmt, env) {
            Value::Return(inner) => return *inner,
            err @ Value::Error(_) => return err,
            value => result = value,
        }
    }

    result
}

fn eval_stmt(stmt: &Stmt, env: &mut Environment) -> Value {
    match stmt {
        Stmt::Declare { name, value } => {
            let value = eval_expr(value, env);
            if value.is_error() {
                return value;
            }
            // Re-declaring a name bound in this very frame starts a fresh
            // frame, so closures that captured the old one keep the old
            // binding.
            if env.has_local(name) {
                *env = Environment::new_enclosed(env.clone());
            }
            env.define(name.clone(), value.clone());
            value
        }
        Stmt::Return { value } => {
            let value = eval_expr(value, env);
            if value.is_error() {
                return value;
            }
            Value::Return(Box::new(value))
        }
        Stmt::Expression { value } => eval_expr(value, env),
    }
}

// Sentinels (`Return`, `Error`) pass through unwrapped so the enclosing
// function or program boundary can act on them.
fn eval_block(block: &Block, env: &mut Environment) -> Value {
    let mut result = Value::Nothing;

    for stmt in &block.statements {
        result = eval_stmt(stmt, env);
        if matches!(result, Value::Return(_) | Value::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_expr(expr: &Expr, env: &mut Environment) -> Value {
    match expr {
        Expr::Identifier(name) => env
            .get(name)
            .unwrap_or_else(|| Value::Error(format!("unknown identifier {name}"))),
        Expr::Integer(value) => Value::Integer(*value),
        Expr::String(value) => Value::String(value.clone()),
        Expr::Boolean(value) => bool_value(*value),
        Expr::Prefix { op, right } => {
            let right = eval_expr(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix(*op, right)
        }
        Expr::Infix { op, left, right } => {
            let left = eval_expr(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expr(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix(*op, left, right)
        }
        Expr::If {
            condition,
            consequence,
            otherwise,
        } => {
            let condition = eval_expr(condition, env);
            if condition.is_error() {
                return condition;
            }
            // Only the canonical `true` selects the consequence; any other
            // value falls through.
            if condition == TRUE {
                eval_block(consequence, env)
            } else if let Some(otherwise) = otherwise {
                eval_block(otherwise, env)
            } else {
                Value::Nothing
            }
        }
        Expr::Function { parameters, body } => Value::Function(FunctionValue {
            parameters: parameters.clone(),
            body: body.clone(),
            env: env.clone(),
        }),
        Expr::Call {
            function,
            arguments,
        } => {
            let callee = eval_expr(function, env);
            if callee.is_error() {
                return callee;
            }
            let function = match callee {
                Value::Function(function) => function,
                other => {
                    return Value::Error(format!(
                        "unsupported function expression. {}",
                        other.type_name()
                    ));
                }
            };

            let mut values = Vec::with_capacity(arguments.len());
            for argument in arguments {
                let value = eval_expr(argument, env);
                if value.is_error() {
                    return value;
                }
                values.push(value);
            }

            apply_function(function, values)
        }
    }
}

fn eval_prefix(op: PrefixOp, right: Value) -> Value {
    match (op, right) {
        (PrefixOp::Negate, Value::Integer(value)) => Value::Integer(value.wrapping_neg()),
        (PrefixOp::Not, Value::Boolean(value)) => bool_value(!value),
        (op, right) => Value::Error(format!("invalid operator. {op}{}", right.type_name())),
    }
}

fn eval_infix(op: InfixOp, left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => eval_integer_infix(op, left, right),
        (Value::Boolean(left), Value::Boolean(right)) => match op {
            InfixOp::Equal => bool_value(left == right),
            InfixOp::NotEqual => bool_value(left != right),
            op => type_mismatch(op, &Value::Boolean(left), &Value::Boolean(right)),
        },
        (Value::String(left), Value::String(right)) => match op {
            InfixOp::Plus => Value::String(left + &right),
            InfixOp::Equal => bool_value(left == right),
            InfixOp::NotEqual => bool_value(left != right),
            op => type_mismatch(op, &Value::String(left), &Value::String(right)),
        },
        (left, right) => type_mismatch(op, &left, &right),
    }
}

fn eval_integer_infix(op: InfixOp, left: i64, right: i64) -> Value {
    match op {
        InfixOp::Plus => Value::Integer(left.wrapping_add(right)),
        InfixOp::Minus => Value::Integer(left.wrapping_sub(right)),
        InfixOp::Star => Value::Integer(left.wrapping_mul(right)),
        InfixOp::Slash => {
            if right == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(left.wrapping_div(right))
            }
        }
        InfixOp::Less => bool_value(left < right),
        InfixOp::Greater => bool_value(left > right),
        InfixOp::Equal => bool_value(left == right),
        InfixOp::NotEqual => bool_value(left != right),
    }
}

fn type_mismatch(op: InfixOp, left: &Value, right: &Value) -> Value {
    Value::Error(format!(
        "operator type mismatch. {} {op} {}",
        left.type_name(),
        right.type_name()
    ))
}

fn apply_function(function: FunctionValue, arguments: Vec<Value>) -> Value {
    if function.parameters.len() != arguments.len() {
        return Value::Error(format!(
            "argument count mismatch: expected {} got {}",
            function.parameters.len(),
            arguments.len()
        ));
    }

    let mut env = Environment::new_enclosed(function.env.clone());
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        env.define(parameter.clone(), argument);
    }

    match eval_block(&function.body, &mut env) {
        Value::Return(inner) => *inner,
        other => other,
    }
}
