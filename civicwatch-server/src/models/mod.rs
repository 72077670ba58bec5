pub mod champion;
pub mod notification;
pub mod project;
pub mod report;

pub use champion::*;
pub use notification::*;
pub use project::*;
pub use report::*;
