use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use mipsasm_rs::{emit, parse, OutputFormat, ParseError, Program};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Two-pass MIPS assembler producing flat instruction images"
)]
struct Opts {
    /// Input assembly file (stdin if nothing specified)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output file (stdout if nothing specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Type of output
    #[arg(short = 't', long, value_enum, default_value_t = OutputFormat::Vhdl)]
    format: OutputFormat,
    /// Boot address the image will be loaded at (hex or dec)
    #[arg(long, default_value = "0xbfc00000", value_parser = parse_u32)]
    boot_addr: u32,
    /// Export declared labels to JSON (Vec<{ name, addr }>)
    #[arg(long, value_name = "FILE")]
    symbols: Option<PathBuf>,
}

fn parse_u32(s: &str) -> Result<u32, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse::<u32>()
    }
}

/// Echo the offending line with a caret under the error column, keeping
/// tabs so the caret stays aligned.
fn render_parse_error(source: &str, err: &ParseError) -> String {
    let mut msg = err.to_string();
    if let Some(line) = source.lines().nth(err.line.saturating_sub(1)) {
        msg.push('\n');
        msg.push_str(line);
        msg.push('\n');
        for c in line.chars().take(err.col) {
            msg.push(if c == '\t' { '\t' } else { ' ' });
        }
        msg.push('^');
    }
    msg
}

#[derive(Debug, Clone, serde::Serialize)]
struct LabelKV {
    name: String,
    addr: u32,
}

fn write_symbols(path: &Path, prog: &Program, boot_addr: u32) -> Result<()> {
    let mut arr: Vec<LabelKV> = prog
        .labels()
        .iter()
        .map(|(name, &pos)| LabelKV {
            name: name.clone(),
            addr: boot_addr.wrapping_add(pos * 4),
        })
        .collect();
    arr.sort_by(|a, b| a.addr.cmp(&b.addr).then_with(|| a.name.cmp(&b.name)));
    let json = serde_json::to_string_pretty(&arr)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let source = match &opts.input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            s
        }
    };

    let prog = match parse::parse_source(&source) {
        Ok(prog) => prog,
        Err(err) => {
            eprintln!("parsing error: {}", render_parse_error(&source, &err));
            std::process::exit(1);
        }
    };

    // Pass 2 runs to completion before any output destination is touched;
    // a bind failure must not leave a truncated image behind.
    let words = match prog.bind_all(opts.boot_addr) {
        Ok(words) => words,
        Err(err) => {
            eprintln!("binding error: {err}");
            std::process::exit(2);
        }
    };

    if let Some(path) = &opts.symbols {
        write_symbols(path, &prog, opts.boot_addr)?;
    }

    let mut image = Vec::new();
    emit::write_image(&mut image, &words, opts.boot_addr, opts.format)?;
    match &opts.output {
        Some(path) => {
            fs::write(path, &image).with_context(|| format!("writing {}", path.display()))?
        }
        None => io::stdout().write_all(&image)?,
    }
    Ok(())
}
