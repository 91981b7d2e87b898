//! Console I/O for interactive commands.
//!
//! Commands never touch stdin/stdout directly: they ask questions through a
//! [`Prompt`] and write to the sinks of a [`Console`], so tests can script
//! the answers and capture the output.

use std::io::{self, BufRead, Write};

/// Ask the operator for one line of text.
pub trait Prompt {
    /// Show `question` and return the answer without its line terminator.
    /// End of input yields an empty answer.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Prompt on the process terminal.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{question}")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(strip_line_ending(line))
    }
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// A prompt and the two output sinks of a command.
pub struct Console<'a> {
    prompt: &'a mut dyn Prompt,
    /// Regular output (stdout).
    pub out: &'a mut (dyn Write + Send),
    /// Error output (stderr).
    pub err: &'a mut (dyn Write + Send),
}

impl<'a> Console<'a> {
    pub fn new(
        prompt: &'a mut dyn Prompt,
        out: &'a mut (dyn Write + Send),
        err: &'a mut (dyn Write + Send),
    ) -> Self {
        Self { prompt, out, err }
    }

    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        self.prompt.ask(question)
    }
}

/// Answers a fixed script of questions; records what was asked.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.asked.push(question.to_owned());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

/// Captured output of a command run in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Captured {
    pub out: Vec<u8>,
    pub err: Vec<u8>,
}

#[cfg(test)]
impl Captured {
    pub fn console<'a>(&'a mut self, prompt: &'a mut dyn Prompt) -> Console<'a> {
        Console::new(prompt, &mut self.out, &mut self.err)
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.err).into_owned()
    }
}
