mod command;
mod contact;

pub use command::*;
pub use contact::*;
