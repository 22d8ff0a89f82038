use serde::{Deserialize, Serialize};

use super::{
    error::{ForthError, ForthResult},
    runtime::Runtime,
    token::Token,
    vm::Program,
};

/// Words the compiler binds to native operations.
pub static BUILTINS: phf::Map<&'static str, Builtin> = phf::phf_map! {
    "+" => Builtin::Add,
    "-" => Builtin::Sub,
    "*" => Builtin::Mul,
    "/" => Builtin::Div,
    "dup" => Builtin::Dup,
    "emit" => Builtin::Emit,
    "." => Builtin::Period,
};

#[derive(PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Debug, Hash)]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    Div,
    Dup,
    Emit,
    Period,
}

type IntOp = fn(i32, i32) -> ForthResult<i32>;
type RealOp = fn(f32, f32) -> f32;

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Dup => "dup",
            Builtin::Emit => "emit",
            Builtin::Period => ".",
        }
    }

    pub(crate) fn eval<RT: Runtime>(&self, program: &mut Program<RT>) -> ForthResult<()> {
        match self {
            Builtin::Add => binary_op(program, "+", |x, y| Ok(x.wrapping_add(y)), |x, y| x + y),
            Builtin::Sub => binary_op(program, "-", |x, y| Ok(x.wrapping_sub(y)), |x, y| x - y),
            Builtin::Mul => binary_op(program, "*", |x, y| Ok(x.wrapping_mul(y)), |x, y| x * y),
            Builtin::Div => binary_op(
                program,
                "/",
                |x, y| {
                    if y == 0 {
                        Err(ForthError::DivisionByZero)
                    } else {
                        Ok(x.wrapping_div(y))
                    }
                },
                |x, y| x / y,
            ),
            Builtin::Dup => dup(program),
            Builtin::Emit => emit(program),
            Builtin::Period => period(program),
        }
    }
}

// the top of the stack is the left operand: `3 4 -` is 4 - 3
fn binary_op<RT: Runtime>(
    program: &mut Program<RT>,
    name: &'static str,
    int_op: IntOp,
    real_op: RealOp,
) -> ForthResult<()> {
    let x = program.pop_for(name)?;
    let y = program.pop_for(name)?;
    let res = match (x, y) {
        (Token::Integer(x), Token::Integer(y)) => Token::Integer(int_op(x, y)?),
        (Token::Real(x), Token::Real(y)) => Token::Real(real_op(x, y)),
        (x, y) => {
            return Err(ForthError::TypeMismatch {
                word: name,
                detail: format!("cannot combine {} with {}", x.kind(), y.kind()),
            })
        }
    };
    program.push(res);
    Ok(())
}

fn dup<RT: Runtime>(program: &mut Program<RT>) -> ForthResult<()> {
    let x = program.pop_for("dup")?;
    program.push(x);
    program.push(x);
    Ok(())
}

fn emit<RT: Runtime>(program: &mut Program<RT>) -> ForthResult<()> {
    let code = match program.pop_for("emit")? {
        Token::Integer(code) => code,
        other => {
            return Err(ForthError::TypeMismatch {
                word: "emit",
                detail: format!("expected integer, found {}", other.kind()),
            })
        }
    };
    let ch = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or(ForthError::InvalidCodePoint(code))?;
    let mut buf = [0u8; 4];
    program.runtime_mut().print(ch.encode_utf8(&mut buf))?;
    Ok(())
}

fn period<RT: Runtime>(program: &mut Program<RT>) -> ForthResult<()> {
    let x = program.pop_for(".")?;
    let line = match x {
        Token::Integer(val) => format!("{val}\n"),
        Token::Real(val) => format!("{val}\n"),
        Token::Symbol(id) => match program.interner().resolve(id) {
            Some(text) => format!("{text}\n"),
            None => format!("{id}\n"),
        },
    };
    program.runtime_mut().print(&line)?;
    Ok(())
}
