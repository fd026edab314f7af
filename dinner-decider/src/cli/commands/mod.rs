// Module for command implementations

pub mod check;
pub mod history;
pub mod init;
pub mod suggest;
