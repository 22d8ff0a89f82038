use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use stackforth::{forth::image, prelude::*};

/// Stack language REPL
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source file to evaluate line by line instead of reading stdin
    file: Option<PathBuf>,

    /// Run a bytecode image produced by forthc
    #[arg(short, long, conflicts_with = "file")]
    image: Option<PathBuf>,

    /// Don't print a prompt
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn to_quit(cmd: &str) -> bool {
    matches!(cmd, "quit" | "q" | "exit")
}

fn render<RT: Runtime>(program: &Program<RT>, token: &Token) -> String {
    match token {
        Token::Integer(val) => val.to_string(),
        Token::Real(val) => val.to_string(),
        Token::Symbol(id) => program
            .interner()
            .resolve(*id)
            .map(str::to_owned)
            .unwrap_or_else(|| id.to_string()),
    }
}

fn handle_line<RT: Runtime>(
    program: &mut Program<RT>,
    line: &str,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    let input = line.trim();
    if to_quit(input) {
        return Ok(Flow::Quit);
    }
    match input {
        ".s" => {
            let program: &Program<RT> = program;
            let items: Vec<_> = program.stack().iter().map(|t| render(program, t)).collect();
            writeln!(out, "<{}> {}", items.len(), items.join(" "))?;
        }
        ".words" => {
            for (id, text) in program.interner().iter() {
                writeln!(out, "{}:{:?}", id.get(), text)?;
            }
        }
        _ => program.eval(input)?,
    }
    Ok(Flow::Continue)
}

fn run_image(path: &Path) -> anyhow::Result<()> {
    let mut bytes = fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;
    let image = image::from_bytes(&mut bytes)?;
    let mut program = Program::from_image(image, ConsoleRuntime)?;
    program.run_to_end()?;
    Ok(())
}

fn run_file(path: &Path) -> anyhow::Result<()> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to load {path:?}"))?;
    let mut program = Program::new(ConsoleRuntime);
    let mut stdout = io::stdout();
    for (idx, line) in source.lines().enumerate() {
        let flow = handle_line(&mut program, line, &mut stdout)
            .with_context(|| format!("{}:{}", path.display(), idx + 1))?;
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn run_repl(quiet: bool) -> anyhow::Result<()> {
    let mut program = Program::new(ConsoleRuntime);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        if !quiet {
            print!("> ");
            stdout.flush()?;
        }
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        match handle_line(&mut program, &line, &mut stdout) {
            Ok(Flow::Quit) => {
                if !quiet {
                    println!("Bye!");
                }
                return Ok(());
            }
            Ok(Flow::Continue) => {}
            Err(e) => {
                log::debug!("line failed, state {:?}", program.state());
                println!("Error: {e}");
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    match (&args.image, &args.file) {
        (Some(path), _) => run_image(path),
        (None, Some(path)) => run_file(path),
        (None, None) => run_repl(args.quiet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Captured(String);

    impl Runtime for Captured {
        fn print(&mut self, text: &str) -> io::Result<()> {
            self.0.push_str(text);
            Ok(())
        }
    }

    #[test]
    fn test_quit_words() {
        for cmd in ["quit", "q", "exit"] {
            assert!(to_quit(cmd));
        }
        assert!(!to_quit("dup"));
    }

    #[test]
    fn test_session() -> anyhow::Result<()> {
        let mut program = Program::new(Captured::default());
        let mut out = Vec::new();
        assert_eq!(handle_line(&mut program, "1 2.5\n", &mut out)?, Flow::Continue);
        handle_line(&mut program, ".s", &mut out)?;
        assert_eq!(String::from_utf8(out)?, "<2> 1 2.5\n");

        assert!(handle_line(&mut program, "+", &mut Vec::new()).is_err());
        handle_line(&mut program, "3 4 * .", &mut Vec::new())?;
        assert_eq!(program.runtime().0, "12\n");
        assert_eq!(handle_line(&mut program, "  q ", &mut Vec::new())?, Flow::Quit);
        Ok(())
    }

    #[test]
    fn test_words_listing() -> anyhow::Result<()> {
        let mut program = Program::new(Captured::default());
        let id = program.intern("hello");
        let mut out = Vec::new();
        handle_line(&mut program, ".words", &mut out)?;
        assert_eq!(String::from_utf8(out)?, format!("{}:\"hello\"\n", id.get()));
        Ok(())
    }
}
