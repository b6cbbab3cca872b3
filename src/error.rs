/// Everything that can go wrong inside the language itself.
///
/// These never escape as Rust errors. They are wrapped in
/// [`Value::Error`](crate::value::Value::Error) and travel through
/// evaluation like any other value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LispError {
    #[error("empty input")]
    EmptyInput,
    #[error("invalid syntax: {}", _0)]
    InvalidSyntax(String),
    #[error("unfinished parenthesis")]
    UnfinishedParen,
    #[error("nesting too deep ({})", _0)]
    NestingTooDeep(usize),
    #[error("{} has no value", _0)]
    Unbound(String),
    #[error("wrong type")]
    WrongType,
    #[error("noimpl")]
    NoImpl,
    #[error("division by zero")]
    DivisionByZero,
    #[error("recursion depth exceeded ({})", _0)]
    DepthExceeded(usize),
}

impl LispError {
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            LispError::EmptyInput
                | LispError::InvalidSyntax(_)
                | LispError::UnfinishedParen
                | LispError::NestingTooDeep(_)
        )
    }
}
