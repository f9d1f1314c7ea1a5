use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{info, trace};

use crate::app::Falcon;

const PROMPT: &str = ">> ";

/// Reads commands line by line until `bye` or end of input.
pub fn run(app: &mut Falcon, reader: &mut dyn BufRead, writer: &mut dyn Write) -> Result<()> {
    info!("Interactive session started");
    let startup = app.startup_message();
    if !startup.is_empty() {
        writeln!(writer, "{startup}")?;
    }

    loop {
        write!(writer, "{PROMPT}")?;
        writer.flush()?;

        let mut input = String::new();
        let read = reader
            .read_line(&mut input)
            .context("failed reading from input")?;
        if read == 0 {
            info!("End of input, leaving");
            writeln!(writer)?;
            return Ok(());
        }
        let input = input.trim_end_matches(['\r', '\n']);
        if input.trim().is_empty() {
            continue;
        }

        trace!("Input: {}", input);
        let reply = app.get_response(input);
        writeln!(writer, "{}", reply.text)?;
        if reply.exit {
            info!("Exit command received");
            return Ok(());
        }
    }
}
