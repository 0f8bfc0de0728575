//! Input loop and shutdown reporting.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use chainsort_core::SelfSortingList;
use tracing::{debug, warn};

/// Counters for one driver session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub lines: usize,
    pub pieces: usize,
    pub prints: usize,
}

/// Feeds `input` into `list` until end of input.
///
/// Non-empty lines are pushed through the chunking contract; an empty line
/// writes the current contents to `output`, one value per line. Bytes that
/// are not valid UTF-8 are replaced with U+FFFD and the session continues.
pub fn run<R, W>(list: &SelfSortingList<String>, mut input: R, output: &mut W) -> io::Result<SessionStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = SessionStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(trim_line_ending(&buf));

        if line.is_empty() {
            print_contents(list, output)?;
            stats.prints += 1;
        } else {
            let pieces = list.push_line(&line);
            debug!(pieces, "line pushed");
            stats.lines += 1;
            stats.pieces += pieces;
        }
    }

    Ok(stats)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn print_contents<W: Write>(list: &SelfSortingList<String>, output: &mut W) -> io::Result<()> {
    for value in list {
        writeln!(output, "{value}")?;
    }
    output.flush()
}

/// Stops the list and reports the swap count, then waits for the workers.
pub fn shutdown<W: Write>(
    list: &SelfSortingList<String>,
    output: &mut W,
    grace: Duration,
) -> io::Result<()> {
    writeln!(output, "Shutting down...")?;
    list.shutdown();
    writeln!(output, "Steps performed {} times.", list.swap_count())?;
    output.flush()?;

    list.interrupt();
    if !list.await_termination(grace) {
        warn!(?grace, "sort workers still running after grace period");
    }
    Ok(())
}
