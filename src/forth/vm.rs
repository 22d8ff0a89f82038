use serde::{Deserialize, Serialize};

use super::{
    compiler::Compiler,
    error::{ForthError, ForthResult},
    intern::{Interner, StringId},
    ops::Builtin,
    runtime::Runtime,
    token::{tokenize, Token},
};

#[derive(PartialEq, Clone, Copy, Serialize, Deserialize, Debug)]
pub enum Opcode {
    PushLiteral(Token),
    CallBuiltin(Builtin),
    /// Saves the instruction pointer on the return stack and jumps to the
    /// target. Reserved for user defined words, never compiled.
    CallFunction(usize),
    /// Pops the return stack and jumps back. Reserved, never compiled.
    Return,
    EndOfProgram,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum State {
    Ready,
    Running,
    Halted,
    /// The last evaluation failed. The program can still be evaluated again.
    Faulted,
}

/// Everything that survives between two evaluation calls: strings, compiled
/// instructions and both stacks.
#[derive(Debug)]
pub struct Program<RT> {
    interner: Interner,
    compiler: Compiler,
    instructions: Vec<Opcode>,
    stack: Vec<Token>,
    return_stack: Vec<usize>,
    ip: usize,
    state: State,
    runtime: RT,
}

impl<RT> Program<RT>
where
    RT: Runtime,
{
    pub fn new(runtime: RT) -> Self {
        Self::with_parts(Interner::new(), Vec::new(), runtime)
    }

    pub(crate) fn with_parts(interner: Interner, instructions: Vec<Opcode>, runtime: RT) -> Self {
        Self {
            interner,
            compiler: Compiler::new(),
            instructions,
            stack: Vec::new(),
            return_stack: Vec::new(),
            ip: 0,
            state: State::Ready,
            runtime,
        }
    }

    /// Tokenizes, compiles and runs `text` on top of whatever earlier calls
    /// left behind.
    pub fn eval(&mut self, text: &str) -> ForthResult<()> {
        let start = self.compile_only(text)?;
        self.run_from(start)
    }

    /// Compiles `text` into a new batch without running it and returns the
    /// index of its first instruction.
    pub fn compile_only(&mut self, text: &str) -> ForthResult<usize> {
        let tokens = tokenize(text, &mut self.interner);
        forth_trace!("tokens {:?}", tokens);
        let ops = self
            .compiler
            .compile(&tokens, &mut self.interner)
            .map_err(|e| {
                self.state = State::Faulted;
                e
            })?;
        let start = self.instructions.len();
        self.instructions.extend(ops);
        Ok(start)
    }

    pub fn run_from(&mut self, ip: usize) -> ForthResult<()> {
        if ip > self.instructions.len() {
            self.state = State::Faulted;
            return Err(ForthError::BadJump(ip));
        }
        self.ip = ip;
        self.state = State::Running;
        let res = self.run();
        self.state = if res.is_ok() {
            State::Halted
        } else {
            self.skip_batch();
            State::Faulted
        };
        self.dump_state();
        res
    }

    // a faulted batch is abandoned: move past its terminator
    fn skip_batch(&mut self) {
        let rest = self.instructions.get(self.ip..).unwrap_or_default();
        self.ip = match rest.iter().position(|op| matches!(op, Opcode::EndOfProgram)) {
            Some(offset) => self.ip + offset + 1,
            None => self.instructions.len(),
        };
    }

    /// Runs every remaining batch starting at the current instruction pointer.
    /// A faulted batch is never resumed.
    pub fn run_to_end(&mut self) -> ForthResult<()> {
        while self.ip < self.instructions.len() {
            self.run_from(self.ip)?;
        }
        Ok(())
    }

    fn run(&mut self) -> ForthResult<()> {
        loop {
            let op = *self
                .instructions
                .get(self.ip)
                .ok_or(ForthError::BadJump(self.ip))?;
            forth_trace!("{:>4} {:?}", self.ip, op);
            self.ip += 1;
            match op {
                Opcode::PushLiteral(token) => self.push(token),
                Opcode::CallBuiltin(builtin) => builtin.eval(self)?,
                Opcode::CallFunction(target) => {
                    if target > self.instructions.len() {
                        return Err(ForthError::BadJump(target));
                    }
                    self.return_stack.push(self.ip);
                    self.ip = target;
                }
                Opcode::Return => {
                    self.ip = self
                        .return_stack
                        .pop()
                        .ok_or(ForthError::StackUnderflow("return"))?;
                }
                Opcode::EndOfProgram => return Ok(()),
            }
        }
    }

    pub fn dump_state(&self) {
        forth_debug!("state: {:?} ip: {}", self.state, self.ip);
        forth_debug!("stack: {:?}", self.stack);
        forth_debug!("rstack: {:?}", self.return_stack);
    }

    pub fn push(&mut self, token: Token) {
        forth_trace!("push {:?}", token);
        self.stack.push(token);
    }

    pub fn pop(&mut self) -> Option<Token> {
        self.stack.pop()
    }

    /// Pops on behalf of `word`, naming it in the underflow error.
    pub(crate) fn pop_for(&mut self, word: &'static str) -> ForthResult<Token> {
        self.stack.pop().ok_or(ForthError::StackUnderflow(word))
    }

    pub fn intern(&mut self, text: &str) -> StringId {
        self.interner.intern(text)
    }

    pub fn stack(&self) -> &[Token] {
        &self.stack
    }

    pub fn return_stack(&self) -> &[usize] {
        &self.return_stack
    }

    pub fn instructions(&self) -> &[Opcode] {
        &self.instructions
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn runtime(&self) -> &RT {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut RT {
        &mut self.runtime
    }

}
