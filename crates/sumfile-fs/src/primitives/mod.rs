pub mod atomic_write;
pub mod resolve;

pub use atomic_write::{atomic_read, atomic_write, read_text, remove_if_exists, AtomicWriteOptions};
pub use resolve::{resolve, resolve_entry};
