mod cli;
mod status;

pub use cli::GitCliPlugin;
pub use status::{parse_porcelain, StatusEntry};
