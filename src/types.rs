use std::fmt;

/// The closed set of runtime kinds a [`Value`](crate::value::Value) can have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Nil,
    Number,
    Symbol,
    Cons,
    Error,
    Builtin,
    Closure,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tag::Nil => write!(f, "nil"),
            Tag::Number => write!(f, "number"),
            Tag::Symbol => write!(f, "symbol"),
            Tag::Cons => write!(f, "cons"),
            Tag::Error => write!(f, "error"),
            Tag::Builtin => write!(f, "builtin"),
            Tag::Closure => write!(f, "closure"),
        }
    }
}
