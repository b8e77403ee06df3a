//! pl-telemetry: line-oriented JSON link between the engine and an external consumer.
//!
//! Outgoing telemetry and incoming commands are one JSON object per line. A reader
//! thread parses commands off the input stream and leaves them in an [`Inbox`]; the
//! [`Session`] loop polls the inbox between steps, so a missing command never stalls
//! stepping and gain changes always land on a step boundary.

pub mod error;
pub mod inbox;
pub mod mailbox;
pub mod protocol;
pub mod reader;
pub mod session;
pub mod writer;

pub use error::{TelemetryError, TelemetryResult};
pub use inbox::{Inbox, InboxSender, inbox};
pub use mailbox::Mailbox;
pub use protocol::{
    Command, DisplayLimits, TelemetryRecord, decode_telemetry, encode_telemetry, parse_command,
};
pub use reader::{ReaderStats, read_commands, spawn_reader};
pub use session::{Pacing, Session, SessionOptions, SessionSummary};
pub use writer::TelemetryWriter;
