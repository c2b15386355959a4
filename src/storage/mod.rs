pub mod layout;
pub mod writer;
pub mod memory;
pub mod tuple_log;
