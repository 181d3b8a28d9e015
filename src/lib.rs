pub mod config;
pub mod constants;
pub mod error;
pub mod memory;
pub mod page_table;
pub mod report;
pub mod simulator;
pub mod translation;

// Re-export commonly used items for convenience
pub use config::MemoryConfig;
pub use error::SimError;
pub use page_table::{ControlBits, PageTableEntry};
pub use simulator::{MemorySimulator, WriteSummary};
pub use translation::{Translation, VirtualAddress};
