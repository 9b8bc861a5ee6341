use std::io::{self, BufRead, Write};

use crate::environment::Environment;
use crate::interpret;

pub const PROMPT: &str = ">> ";

/// Line-at-a-time loop: lex, parse, evaluate against one persistent root
/// environment, print the result's inspection form. Parse diagnostics are
/// printed and the session continues.
pub fn start(input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    let mut env = Environment::new();
    let mut lines = input.lines();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };

        match interpret(&line?, &mut env) {
            Ok(value) => writeln!(output, "{value}")?,
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}
