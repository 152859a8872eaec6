//! Line-based prompt collaborators

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Synchronous "ask a question, get a line back" capability.
///
/// Implementations block until an answer is available. The returned string
/// has its trailing newline removed and is otherwise verbatim.
pub trait Prompt: Send + Sync {
    fn ask(&self, label: &str) -> io::Result<String>;
}

/// Strip a trailing `\n` or `\r\n`
pub fn trim_newline(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

fn poisoned<T>(_: T) -> io::Error {
    io::Error::new(io::ErrorKind::Other, "prompt state poisoned")
}

/// Prompt on stderr, read answers from stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for TerminalPrompt {
    fn ask(&self, label: &str) -> io::Result<String> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{}: ", label)?;
        stderr.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed while asking for {}", label),
            ));
        }

        Ok(trim_newline(&line).to_string())
    }
}

/// Replays scripted answers in order and records every label asked.
///
/// Running out of answers behaves like a closed input stream.
#[derive(Debug, Default)]
pub struct CannedPrompt {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl CannedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Labels asked so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.asked().len()
    }
}

impl Prompt for CannedPrompt {
    fn ask(&self, label: &str) -> io::Result<String> {
        self.asked.lock().map_err(poisoned)?.push(label.to_string());

        let answer = self.answers.lock().map_err(poisoned)?.pop_front();
        match answer {
            Some(answer) => Ok(trim_newline(&answer).to_string()),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer for {}", label),
            )),
        }
    }
}
