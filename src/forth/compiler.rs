use heapless::FnvIndexMap;

use super::{
    error::{ForthError, ForthResult},
    intern::{Interner, StringId},
    ops::{Builtin, BUILTINS},
    token::Token,
    vm::Opcode,
};

// power of two, at least BUILTINS.len()
const BUILTIN_SLOTS: usize = 8;

pub type BuiltinTable = FnvIndexMap<StringId, Builtin, BUILTIN_SLOTS>;

/// Single pass token-to-opcode translation. Builtin names are interned the
/// first time something is compiled and compared by id from then on.
#[derive(Debug, Default, Clone)]
pub struct Compiler {
    builtins: Option<BuiltinTable>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    fn builtins(&mut self, interner: &mut Interner) -> &BuiltinTable {
        self.builtins.get_or_insert_with(|| {
            let mut table = BuiltinTable::new();
            for (name, builtin) in BUILTINS.entries() {
                let id = interner.intern(name);
                forth_debug!("builtin {:?} is {}", builtin, id);
                table
                    .insert(id, *builtin)
                    .expect("builtin table is sized for every builtin");
            }
            table
        })
    }

    /// Compiles one batch, terminated by [`Opcode::EndOfProgram`]. Nothing is
    /// returned unless every token compiled.
    pub fn compile(&mut self, tokens: &[Token], interner: &mut Interner) -> ForthResult<Vec<Opcode>> {
        let builtins = self.builtins(interner);
        let mut ops = Vec::with_capacity(tokens.len() + 1);
        for token in tokens {
            let op = match token {
                Token::Integer(_) | Token::Real(_) => Opcode::PushLiteral(*token),
                Token::Symbol(id) => match builtins.get(id) {
                    Some(builtin) => Opcode::CallBuiltin(*builtin),
                    None => {
                        let name = interner.resolve(*id).unwrap_or_default();
                        return Err(ForthError::UnknownSymbol(name.to_owned()));
                    }
                },
            };
            ops.push(op);
        }
        ops.push(Opcode::EndOfProgram);
        forth_debug!("compiled {} tokens", tokens.len());
        Ok(ops)
    }
}
