use crate::{error::LispError, eval::Interpreter, value::*};

macro_rules! builtin_functions {
    ($($name:literal => $func:path),* $(,)?) => {
        &[$(($name, $func as BuiltinFn)),*]
    }
}

/// Every builtin procedure, installed into the global environment of each session
pub const BUILTINS: &[(&str, BuiltinFn)] = builtin_functions!(
    "car" => car,
    "cdr" => cdr,
    "cons" => cons,
    "eq" => eq,
    "atom" => atom,
    "numberp" => numberp,
    "symbolp" => symbolp,
    "+" => add,
    "*" => mul,
    "-" => sub,
    "/" => div,
    "mod" => rem,
);

fn car(_: &Interpreter, args: &Value) -> Value {
    args.car().car()
}

fn cdr(_: &Interpreter, args: &Value) -> Value {
    args.car().cdr()
}

fn cons(_: &Interpreter, args: &Value) -> Value {
    Value::cons(args.nth(0), args.nth(1))
}

fn eq(interp: &Interpreter, args: &Value) -> Value {
    interp.truth(args.nth(0).identical(&args.nth(1)))
}

fn atom(interp: &Interpreter, args: &Value) -> Value {
    interp.truth(!matches!(args.car(), Value::Cons(_)))
}

fn numberp(interp: &Interpreter, args: &Value) -> Value {
    interp.truth(matches!(args.car(), Value::Num(_)))
}

fn symbolp(interp: &Interpreter, args: &Value) -> Value {
    interp.truth(matches!(args.car(), Value::Sym(_)))
}

/// Folds every operand, all of which must be numbers
fn fold(args: &Value, init: f64, f: fn(f64, f64) -> f64) -> Value {
    let mut acc = init;
    for arg in args.iter() {
        match arg {
            Value::Num(n) => acc = f(acc, n),
            _ => return LispError::WrongType.into(),
        }
    }
    Value::Num(acc)
}

fn add(_: &Interpreter, args: &Value) -> Value {
    fold(args, 0.0, |a, b| a + b)
}

fn mul(_: &Interpreter, args: &Value) -> Value {
    fold(args, 1.0, |a, b| a * b)
}

/// The first two operands as numbers. Anything past them is ignored.
fn two_nums(args: &Value) -> Result<(f64, f64), LispError> {
    match (args.nth(0).as_num(), args.nth(1).as_num()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(LispError::WrongType),
    }
}

fn binary(args: &Value, f: impl FnOnce(f64, f64) -> Result<f64, LispError>) -> Value {
    match two_nums(args).and_then(|(a, b)| f(a, b)) {
        Ok(n) => Value::Num(n),
        Err(e) => e.into(),
    }
}

fn sub(_: &Interpreter, args: &Value) -> Value {
    binary(args, |a, b| Ok(a - b))
}

fn div(_: &Interpreter, args: &Value) -> Value {
    binary(args, |a, b| {
        if b == 0.0 {
            Err(LispError::DivisionByZero)
        } else {
            Ok(a / b)
        }
    })
}

fn rem(_: &Interpreter, args: &Value) -> Value {
    binary(args, |a, b| {
        if b == 0.0 {
            Err(LispError::DivisionByZero)
        } else {
            Ok(a % b)
        }
    })
}
