use std::io;

use super::{runtime::Runtime, vm::Program};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockRuntime {
    pub out: String,
}

impl Runtime for MockRuntime {
    fn print(&mut self, text: &str) -> io::Result<()> {
        self.out.push_str(text);
        Ok(())
    }
}

pub fn program() -> Program<MockRuntime> {
    Program::new(MockRuntime::default())
}

/// Runtime whose writes always fail.
#[derive(Clone, Debug, Default)]
pub struct BrokenPipe;

impl Runtime for BrokenPipe {
    fn print(&mut self, _text: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}
