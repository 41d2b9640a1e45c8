pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod tlb;
pub mod translation;

// Re-export commonly used items for convenience
pub use constants::*;
pub use error::VmError;
pub use translation::{Stats, Translation, Translator, VirtualAddress};
