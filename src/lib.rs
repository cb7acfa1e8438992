pub mod control; // Control-thread → audio-thread parameter messages
pub mod dsp;
pub mod patch; // Serializable modulator configuration

/// Largest chunk a host callback renders in one pass.
pub const MAX_BLOCK_SIZE: usize = 2048;
