mod command;

pub use command::{CommandVerifierPlugin, Probe, ProbeOutcome};
