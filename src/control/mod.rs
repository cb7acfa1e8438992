//! Control-rate parameter changes for the real-time kernels.
//!
//! Automation and note events arrive on a control thread while the kernels
//! live on the audio thread. A [`ControlHandle`] validates and queues
//! [`ControlMessage`]s into a lock-free ring; the audio thread drains them at
//! the top of each block with [`apply_messages`].

pub mod message;

pub use message::{ControlMessage, MessageReceiver};

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::dsp::{
    envelope::AdsrProcessor,
    phase::{note_length_to_rate, PhaseContext},
};

pub const CONTROL_QUEUE_SIZE: usize = 256;

/// Errors reported to the control thread when a message cannot be queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlError {
    /// The message carries a value the kernels would reject
    InvalidMessage(ControlMessage),
    /// The audio thread has not drained the queue
    QueueFull(ControlMessage),
}

impl std::fmt::Display for ControlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlError::InvalidMessage(msg) => write!(f, "Invalid control message: {:?}", msg),
            ControlError::QueueFull(msg) => {
                write!(f, "Control queue full, dropped message: {:?}", msg)
            }
        }
    }
}

impl std::error::Error for ControlError {}

/// Why the kernels would refuse `msg`, if they would.
fn rejection(msg: ControlMessage) -> Option<&'static str> {
    match msg {
        ControlMessage::SetNoteLength(length) if note_length_to_rate(length).is_err() => {
            Some("note length must be greater than 0")
        }
        ControlMessage::SetSampleRate(rate) if !(rate > 0.0) => {
            Some("sample rate must be greater than 0")
        }
        ControlMessage::SetTempo(tempo) if !(tempo > 0.0) => Some("tempo must be greater than 0"),
        _ => None,
    }
}

/// Control-thread end of the parameter queue.
#[cfg(feature = "rtrb")]
pub struct ControlHandle {
    tx: Producer<ControlMessage>,
}

#[cfg(feature = "rtrb")]
impl ControlHandle {
    /// Queue a message. Invalid values are rejected here so the audio thread
    /// never has to deal with them.
    pub fn send(&mut self, msg: ControlMessage) -> Result<(), ControlError> {
        if let Some(reason) = rejection(msg) {
            log::warn!("rejecting control message {:?}: {}", msg, reason);
            return Err(ControlError::InvalidMessage(msg));
        }

        self.tx.push(msg).map_err(|_| {
            log::warn!("control queue full, dropping {:?}", msg);
            ControlError::QueueFull(msg)
        })
    }

    pub fn trigger(&mut self) -> Result<(), ControlError> {
        self.send(ControlMessage::Trigger)
    }

    pub fn release(&mut self) -> Result<(), ControlError> {
        self.send(ControlMessage::Release)
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

/// Create a control queue holding up to `capacity` pending messages.
#[cfg(feature = "rtrb")]
pub fn control_channel(capacity: usize) -> (ControlHandle, Consumer<ControlMessage>) {
    let (tx, rx) = RingBuffer::<ControlMessage>::new(capacity);
    (ControlHandle { tx }, rx)
}

/// Apply a single message. Returns false if the kernel rejected it.
///
/// Receivers other than [`ControlHandle`] skip its checks, so invalid values
/// are dropped here as well.
pub fn apply_message(msg: ControlMessage, phase: &mut PhaseContext, env: &mut AdsrProcessor) -> bool {
    if rejection(msg).is_some() {
        return false;
    }

    match msg {
        ControlMessage::SetRate(rate) => phase.set_rate(rate),
        ControlMessage::SetTempo(tempo) => phase.set_tempo(tempo),
        ControlMessage::SetSampleRate(sample_rate) => phase.set_sample_rate(sample_rate),
        ControlMessage::SetProjectTime(beats) => phase.set_project_time(beats),
        ControlMessage::SetNoteLength(length) => return phase.set_note_length(length).is_ok(),
        ControlMessage::SetSyncMode(mode) => phase.set_sync_mode(mode),
        ControlMessage::Trigger => env.trigger(),
        ControlMessage::Release => env.release(),
        ControlMessage::SetAttack(seconds) => env.set_attack(seconds),
        ControlMessage::SetDecay(seconds) => env.set_decay(seconds),
        ControlMessage::SetSustain(level) => env.set_sustain(level),
        ControlMessage::SetRelease(seconds) => env.set_release(seconds),
    }
    true
}

/// Drain every pending message into the kernels. Call once per block from
/// the audio thread; returns the number of messages applied.
pub fn apply_messages<R: MessageReceiver + ?Sized>(
    rx: &mut R,
    phase: &mut PhaseContext,
    env: &mut AdsrProcessor,
) -> usize {
    let mut applied = 0;
    while let Some(msg) = rx.pop() {
        if apply_message(msg, phase, env) {
            applied += 1;
        }
    }
    applied
}
