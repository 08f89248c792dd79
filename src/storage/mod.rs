pub mod memory;
pub mod trait_def;

pub use memory::MemoryVisitLog;
pub use trait_def::VisitStore;
