//! Console interaction: reading the pasted index and asking for the anchor page.

use crate::resolve::{AnchorQuery, AnchorResolver, ResolutionError};
use std::io::{self, BufRead, IsTerminal, Read, Write};

/// Read the whole index from `input` until end of input.
pub fn read_index<R: Read>(mut input: R) -> io::Result<String> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    Ok(text)
}

/// Read the index from stdin, printing paste instructions when interactive.
pub fn read_index_from_stdin() -> io::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!(
            "Paste the index (title<TAB>page per line), then press {} to finish:",
            if cfg!(windows) { "Ctrl+Z, Enter" } else { "Ctrl+D" }
        );
    }
    read_index(stdin.lock())
}

/// Interpret one line of operator input as a page number.
fn parse_answer(line: &str, query: &AnchorQuery) -> Result<u32, String> {
    let line = line.trim();
    if line.is_empty() {
        return query
            .suggestion
            .ok_or_else(|| "please enter a page number".to_string());
    }
    match line.parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("{:?} is not a page number", line)),
        Ok(page) if page > query.total_pages => Err(format!(
            "page {} is past the end of the document ({} pages)",
            page, query.total_pages
        )),
        Ok(page) => Ok(page),
    }
}

/// Asks on a line-oriented console and re-prompts until the answer is valid.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompt { input, output }
    }
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, answer on stdin.
    pub fn stdio() -> Self {
        ConsolePrompt::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> AnchorResolver for ConsolePrompt<R, W> {
    fn resolve_anchor(&mut self, query: &AnchorQuery) -> Result<u32, ResolutionError> {
        writeln!(
            self.output,
            "The first numbered entry is \"{}\" (printed page {}).",
            query.title, query.printed_page
        )?;

        loop {
            match query.suggestion {
                Some(page) => write!(
                    self.output,
                    "PDF page where it starts (1-{}) [{}]: ",
                    query.total_pages, page
                )?,
                None => write!(
                    self.output,
                    "PDF page where it starts (1-{}): ",
                    query.total_pages
                )?,
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(ResolutionError::NoAnswer(query.title.clone()));
            }

            match parse_answer(&line, query) {
                Ok(page) => return Ok(page),
                Err(msg) => writeln!(self.output, "{}", msg)?,
            }
        }
    }
}
