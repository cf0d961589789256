mod simulated;

pub use simulated::SimulatedPerformer;
