//! Line-based prompt provider over any reader/writer pair

use blogmatter::error::{BlogMatterError, Result};
use blogmatter::Prompter;
use colored::Colorize;
use std::io::{self, BufRead, Write};

pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Read answers from stdin and print questions to stderr
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(BlogMatterError::prompt("input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask_text(&mut self, message: &str, help: Option<&str>) -> Result<String> {
        if let Some(help) = help {
            writeln!(self.output, "{}", help.dimmed())?;
        }
        write!(self.output, "{} ", message.bold())?;
        self.output.flush()?;
        self.read_line()
    }

    fn ask_select(&mut self, message: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            return Err(BlogMatterError::prompt("nothing to choose from"));
        }
        writeln!(self.output, "{}", message.bold())?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", (i + 1).to_string().cyan(), option)?;
        }
        loop {
            write!(self.output, "Choose 1-{}: ", options.len())?;
            self.output.flush()?;
            let answer = self.read_line()?;
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.output, "{}", "Not a valid choice".yellow())?,
            }
        }
    }
}
