pub mod cli;
pub mod init;
