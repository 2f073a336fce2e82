mod date;
mod entry;

pub use date::*;
pub use entry::*;
