use std::io::{BufRead, Write};

use log::{debug, error};

use crate::llm::{LlmClient, LlmError};

/// Words that end an interactive session.
const EXIT_WORDS: &[&str] = &["exit", "quit"];

/// Send one prompt and return the reply.
pub fn ask_once(client: &dyn LlmClient, prompt: &str) -> Result<String, LlmError> {
    debug!("Sending prompt ({} chars)", prompt.len());
    client.complete(prompt)
}

/// Read prompts line by line until EOF or an exit word.
///
/// Blank lines are skipped. A failed call is logged and the session
/// continues.
pub fn run_session<R: BufRead, W: Write>(
    client: &dyn LlmClient,
    mut input: R,
    output: &mut W,
) -> std::io::Result<()> {
    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&prompt.to_lowercase().as_str()) {
            break;
        }

        match ask_once(client, prompt) {
            Ok(reply) => writeln!(output, "{}\n", reply.trim_end())?,
            Err(err) => error!("{}", err),
        }
    }
    Ok(())
}
