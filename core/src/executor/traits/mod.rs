pub mod vcs;
pub mod verifier;
pub mod work;

pub use vcs::*;
pub use verifier::*;
pub use work::*;
