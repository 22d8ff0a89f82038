use std::{fs::File, io::Write, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use stackforth::{
    forth::{image, runtime::Runtime},
    prelude::*,
};

/// Stack language bytecode compiler
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file
    #[arg(short, long)]
    in_file: PathBuf,

    /// Output file (.fbc)
    #[arg(short, long)]
    out_file: PathBuf,
}

/// Nothing runs at compile time, so nothing should ever be printed.
struct NoOutput;

impl Runtime for NoOutput {
    fn print(&mut self, _text: &str) -> std::io::Result<()> {
        Ok(())
    }
}

fn compile(source: &str) -> anyhow::Result<Vec<u8>> {
    let mut program = Program::new(NoOutput);
    for (idx, line) in source.lines().enumerate() {
        program
            .compile_only(line.trim())
            .with_context(|| format!("line {}", idx + 1))?;
    }
    Ok(image::to_bytes(&program.to_image())?)
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let source = std::fs::read_to_string(&args.in_file)
        .with_context(|| format!("Failed to load {:?}", args.in_file))?;
    let ser = compile(&source).context("Compilation failed")?;
    println!("image size is {}", ser.len());

    File::create(&args.out_file)?.write_all(&ser)?;
    Ok(())
}
