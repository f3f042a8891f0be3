use std::io::{self, BufRead, Write};

/// Ask a yes/no question and wait for a single `y` (any case).
///
/// Anything else, including an empty line or end of input, declines.
pub fn confirm<R, W>(question: &str, mut input: R, mut output: W) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{question} (y/N): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    writeln!(output)?;

    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// [`confirm`] against the process's stdin/stdout.
pub fn confirm_on_terminal(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    confirm(question, stdin.lock(), io::stdout())
}
