//! Interactive front-end: asks for targets, a port range and a concurrency
//! limit, then hands the same request shape to the scanner as the subcommands do.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use portly_common::ScanError;
use portly_common::network::range::PortRange;
use portly_common::network::target::Target;

/// What the user asked for. Every field is already validated.
#[derive(Debug)]
pub struct Selection {
    pub targets: Vec<Target>,
    pub range: PortRange,
    pub concurrency: usize,
}

pub fn prompt_stdin() -> anyhow::Result<Selection> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    Ok(prompt(&mut input, &mut output)?)
}

pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Selection, PromptError> {
    writeln!(output, "Welcome to Portly - Advanced Port Scanner!")?;
    writeln!(output, "1. Scan a single IP/domain")?;
    writeln!(output, "2. Scan multiple targets from a file")?;

    let targets: Vec<Target> = match ask(input, output, "Choose an option (1 or 2): ")?.as_str() {
        "1" => {
            let name = ask(input, output, "Enter the target IP address or hostname: ")?;
            vec![Target::new(name)]
        }
        "2" => {
            let path = ask(input, output, "Enter the file path containing targets: ")?;
            Target::from_file(&PathBuf::from(path))?
        }
        other => return Err(ScanError::InvalidChoice(other.to_string()).into()),
    };

    let range: PortRange = prompt_range(input, output)?;

    let threads = ask(input, output, "Enter the number of threads to use: ")?;
    let concurrency: usize = match threads.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => return Err(ScanError::InvalidConcurrency.into()),
    };

    Ok(Selection {
        targets,
        range,
        concurrency,
    })
}

fn prompt_range<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<PortRange, PromptError> {
    writeln!(output, "Select a scan type:")?;
    writeln!(output, "1. Quick Scan (ports 1-1024)")?;
    writeln!(output, "2. Full Scan (ports 1-65535)")?;
    writeln!(output, "3. Custom Scan")?;

    match ask(input, output, "Enter your choice (1-3): ")?.as_str() {
        "1" => Ok(PortRange::quick()),
        "2" => Ok(PortRange::full()),
        "3" => {
            let start = ask_number(input, output, "Enter the start port: ")?;
            let end = ask_number(input, output, "Enter the end port: ")?;
            Ok(PortRange::checked(start, end)?)
        }
        other => Err(ScanError::InvalidChoice(other.to_string()).into()),
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn ask_number<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<u32, PromptError> {
    let answer = ask(input, output, question)?;
    answer
        .parse::<u32>()
        .map_err(|_| ScanError::InvalidPortSpec(answer).into())
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error(transparent)]
    Input(#[from] ScanError),
    #[error("could not read from the terminal: {0}")]
    Io(#[from] io::Error),
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
