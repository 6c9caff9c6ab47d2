use std::io::{self, Write};

/// Writes `message` to stdout and, when given, to `writer` as well.
///
/// A broken stdout is logged and otherwise ignored so the captured copy
/// still receives the message.
pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    if let Err(e) = writeln!(io::stdout(), "{message}") {
        tracing::warn!(error = %e, "failed to write to stdout");
    }

    if let Some(w) = writer {
        writeln!(w, "{message}")?;
    }

    Ok(())
}
