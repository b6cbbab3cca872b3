use std::{fmt, mem, rc::Rc};

use itertools::Itertools;

use crate::{env::Env, error::LispError, eval::Interpreter, symbol::Symbol, types::Tag};

pub type BuiltinFn = fn(&Interpreter, &Value) -> Value;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Num(f64),
    Sym(Symbol),
    Cons(Rc<Cons>),
    Error(Rc<LispError>),
    Builtin(Rc<Builtin>),
    Closure(Rc<Closure>),
}

#[derive(Debug)]
pub struct Cons {
    pub car: Value,
    pub cdr: Value,
}

/// Unlinks the tail iteratively so long lists don't recurse on drop
impl Drop for Cons {
    fn drop(&mut self) {
        let mut next = mem::replace(&mut self.cdr, Value::Nil);
        while let Value::Cons(cell) = next {
            match Rc::try_unwrap(cell) {
                Ok(mut cons) => next = mem::replace(&mut cons.cdr, Value::Nil),
                Err(_) => break,
            }
        }
    }
}

#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

#[derive(Debug)]
pub struct Closure {
    pub params: Value,
    pub body: Value,
    pub env: Env,
}

impl Value {
    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Cons(Rc::new(Cons { car, cdr }))
    }
    pub fn error(error: LispError) -> Value {
        Value::Error(Rc::new(error))
    }
    /// Builds a proper list from the items, back to front
    pub fn list<I>(items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, item| Value::cons(item, tail))
    }
    pub fn tag(&self) -> Tag {
        match self {
            Value::Nil => Tag::Nil,
            Value::Num(_) => Tag::Number,
            Value::Sym(_) => Tag::Symbol,
            Value::Cons(_) => Tag::Cons,
            Value::Error(_) => Tag::Error,
            Value::Builtin(_) => Tag::Builtin,
            Value::Closure(_) => Tag::Closure,
        }
    }
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
    /// The first element of a cons, or nil for anything else
    pub fn car(&self) -> Value {
        match self {
            Value::Cons(cell) => cell.car.clone(),
            _ => Value::Nil,
        }
    }
    /// The rest of a cons, or nil for anything else
    pub fn cdr(&self) -> Value {
        match self {
            Value::Cons(cell) => cell.cdr.clone(),
            _ => Value::Nil,
        }
    }
    /// The `n`th element of a list, or nil if the list is too short
    pub fn nth(&self, n: usize) -> Value {
        self.iter().nth(n).unwrap_or(Value::Nil)
    }
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Sym(sym) => Some(sym),
            _ => None,
        }
    }
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }
    /// Iterates over the elements of a list, stopping at the first non-cons tail
    pub fn iter(&self) -> ListIter {
        ListIter { rest: self.clone() }
    }
    /// Identity comparison. Numbers compare by value.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            (Value::Cons(a), Value::Cons(b)) => Rc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Sym(sym)
    }
}

impl From<LispError> for Value {
    fn from(error: LispError) -> Self {
        Value::error(error)
    }
}

pub struct ListIter {
    rest: Value,
}

impl ListIter {
    /// What is left of the list, which is nil unless the list was dotted
    pub fn tail(&self) -> &Value {
        &self.rest
    }
}

impl Iterator for ListIter {
    type Item = Value;
    fn next(&mut self) -> Option<Self::Item> {
        let (car, cdr) = match &self.rest {
            Value::Cons(cell) => (cell.car.clone(), cell.cdr.clone()),
            _ => return None,
        };
        self.rest = cdr;
        Some(car)
    }
}

pub(crate) fn format_num(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Num(n) => write!(f, "{}", format_num(*n)),
            Value::Sym(sym) => write!(f, "{}", sym),
            Value::Error(error) => write!(f, "<error: {}>", error),
            Value::Builtin(_) | Value::Closure(_) => write!(f, "<{}>", self.tag()),
            Value::Cons(_) => {
                let mut items = self.iter();
                let body = items.join(" ");
                match items.tail() {
                    Value::Nil => write!(f, "({})", body),
                    tail => write!(f, "({} . {})", body, tail),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;

    fn nums(ns: &[f64]) -> Value {
        Value::list(ns.iter().copied().map(Value::Num))
    }

    #[test]
    fn print_atoms() {
        let table = SymbolTable::new();
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Num(42.0).to_string(), "42");
        assert_eq!(Value::Num(-7.0).to_string(), "-7");
        assert_eq!(Value::Num(3.5).to_string(), "3.5");
        assert_eq!(Value::from(table.intern("foo")).to_string(), "foo");
        assert_eq!(
            Value::error(LispError::WrongType).to_string(),
            "<error: wrong type>"
        );
    }

    #[test]
    fn print_lists() {
        assert_eq!(nums(&[1.0, 2.0, 3.0]).to_string(), "(1 2 3)");
        assert_eq!(
            Value::list(vec![nums(&[1.0]), Value::Nil]).to_string(),
            "((1) nil)"
        );
        let dotted = Value::cons(Value::Num(1.0), Value::Num(2.0));
        assert_eq!(dotted.to_string(), "(1 . 2)");
        let longer = Value::cons(Value::Num(1.0), dotted);
        assert_eq!(longer.to_string(), "(1 1 . 2)");
    }

    #[test]
    fn safe_access() {
        let list = nums(&[1.0, 2.0]);
        assert_eq!(list.car().as_num(), Some(1.0));
        assert!(list.cdr().cdr().is_nil());
        assert!(Value::Num(1.0).car().is_nil());
        assert!(Value::Nil.cdr().is_nil());
        assert!(list.nth(5).is_nil());
        assert_eq!(list.iter().count(), 2);
    }

    #[test]
    fn long_lists_drop_iteratively() {
        let list = Value::list(vec![Value::Num(1.0); 1_000_000]);
        assert_eq!(list.iter().count(), 1_000_000);
        drop(list);
    }

    #[test]
    fn shared_tails_survive_drop() {
        let tail = nums(&[2.0, 3.0]);
        let list = Value::cons(Value::Num(1.0), tail.clone());
        drop(list);
        assert_eq!(tail.to_string(), "(2 3)");
    }

    #[test]
    fn identity() {
        let list = nums(&[1.0]);
        assert!(list.identical(&list.clone()));
        assert!(!list.identical(&nums(&[1.0])));
        assert!(Value::Num(2.0).identical(&Value::Num(2.0)));
        assert!(Value::Nil.identical(&Value::Nil));
        assert!(!Value::Nil.identical(&Value::Num(0.0)));
    }
}
