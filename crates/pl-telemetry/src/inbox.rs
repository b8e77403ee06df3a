//! Command delivery from the reader thread to the session loop.
//!
//! Gain records go through a [`Mailbox`]: only the most recent set matters, and the
//! engine picks it up at its next step boundary. Other commands are ordered and
//! must not be lost, so they queue on a channel.

use crate::mailbox::Mailbox;
use crate::protocol::Command;
use pl_controls::ControllerGains;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

/// Writing half, owned by the reader thread.
#[derive(Debug, Clone)]
pub struct InboxSender {
    gains: Mailbox<ControllerGains>,
    controls: Sender<Command>,
}

/// Reading half, polled by the session between steps.
#[derive(Debug)]
pub struct Inbox {
    gains: Mailbox<ControllerGains>,
    controls: Receiver<Command>,
}

pub fn inbox() -> (InboxSender, Inbox) {
    let gains = Mailbox::new();
    let (tx, rx) = channel();
    (
        InboxSender {
            gains: gains.clone(),
            controls: tx,
        },
        Inbox {
            gains,
            controls: rx,
        },
    )
}

impl InboxSender {
    /// Returns `false` once the session has gone away.
    pub fn deliver(&self, command: Command) -> bool {
        match command {
            Command::SetGains(g) => {
                self.gains.put(g);
                true
            }
            other => self.controls.send(other).is_ok(),
        }
    }
}

impl Inbox {
    pub fn take_gains(&self) -> Option<ControllerGains> {
        self.gains.take()
    }

    /// Next queued non-gain command, without blocking.
    pub fn next_control(&self) -> Option<Command> {
        match self.controls.try_recv() {
            Ok(c) => Some(c),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
