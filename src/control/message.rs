#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::phase::SyncMode;

/// Parameter changes sent from the control thread to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    // Phase context
    SetRate(f32),
    SetTempo(f32),
    SetSampleRate(f32),
    SetProjectTime(f32),
    SetNoteLength(f32),
    SetSyncMode(SyncMode),

    // Envelope
    Trigger,
    Release,
    SetAttack(f32),
    SetDecay(f32),
    SetSustain(f32),
    SetRelease(f32),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}
