//! Reader task: parses incoming lines and hands commands to the session.

use crate::inbox::InboxSender;
use crate::protocol::parse_command;
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Counters reported when the input stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    pub accepted: u64,
    pub malformed: u64,
}

/// Read commands until end of input, an I/O error, or the session going away.
///
/// Malformed lines are dropped. Only the first one is reported at `warn`.
pub fn read_commands<R: BufRead>(input: R, sender: &InboxSender) -> ReaderStats {
    let mut stats = ReaderStats::default();
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "command input failed; no further commands will be read");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                debug!(?command, "command received");
                stats.accepted += 1;
                if !sender.deliver(command) {
                    break;
                }
            }
            Err(e) => {
                stats.malformed += 1;
                if stats.malformed == 1 {
                    warn!(error = %e, "ignoring malformed command record");
                } else {
                    debug!(error = %e, count = stats.malformed, "ignoring malformed command record");
                }
            }
        }
    }
    debug!(accepted = stats.accepted, malformed = stats.malformed, "command input closed");
    stats
}

/// Run [`read_commands`] on its own thread.
pub fn spawn_reader<R>(input: R, sender: InboxSender) -> JoinHandle<ReaderStats>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || read_commands(input, &sender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbox::inbox;
    use crate::protocol::Command;
    use std::io::Cursor;

    #[test]
    fn counts_and_delivers() {
        let input = Cursor::new(
            "{\"Kp\":1,\"Ki\":2,\"Kd\":3}\n\
             garbage\n\
             \n\
             {\"Kp\":1}\n\
             [4, 5, 6]\n\
             {\"command_type\":\"stop\"}\n",
        );
        let (tx, rx) = inbox();
        let stats = read_commands(input, &tx);
        assert_eq!(
            stats,
            ReaderStats {
                accepted: 2,
                malformed: 3
            }
        );
        assert_eq!(rx.take_gains().map(|g| g.kd), Some(3.0));
        assert_eq!(rx.next_control(), Some(Command::Stop));
    }

    #[test]
    fn spawned_reader_finishes_at_end_of_input() {
        let (tx, rx) = inbox();
        let handle = spawn_reader(Cursor::new("{\"command_type\":\"reset\"}\n"), tx);
        let stats = handle.join().unwrap();
        assert_eq!(stats.accepted, 1);
        assert_eq!(rx.next_control(), Some(Command::Reset));
    }
}
