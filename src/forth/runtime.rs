use std::io::{self, Write};

/// Where builtins send their output.
pub trait Runtime {
    fn print(&mut self, text: &str) -> io::Result<()>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsoleRuntime;

impl Runtime for ConsoleRuntime {
    fn print(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        // `emit` writes no newline, so line buffering alone would hold it back
        out.flush()
    }
}

impl<RT: Runtime + ?Sized> Runtime for &mut RT {
    fn print(&mut self, text: &str) -> io::Result<()> {
        (**self).print(text)
    }
}
