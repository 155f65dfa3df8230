pub(crate) mod opts;
pub(crate) mod sequencer;
