use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForthError {
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),
    #[error("type mismatch in `{word}`: {detail}")]
    TypeMismatch { word: &'static str, detail: String },
    #[error("stack underflow in `{0}`")]
    StackUnderflow(&'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0} is not a valid code point")]
    InvalidCodePoint(i32),
    #[error("jump to {0} is out of bounds")]
    BadJump(usize),
    #[error("malformed bytecode image: {0}")]
    Image(String),
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type ForthResult<T> = Result<T, ForthError>;
