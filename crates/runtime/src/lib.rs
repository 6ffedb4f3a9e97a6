pub mod frame;
pub mod hover;
pub mod job;
pub mod scheduler;

pub use frame::*;
pub use hover::*;
pub use job::*;
pub use scheduler::*;
