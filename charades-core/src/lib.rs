pub mod categories;
pub mod config;
pub mod countdown;
pub mod manual_clock;
pub mod observer;
pub mod scoring;
pub mod session;

// Re-export main components
pub use categories::*;
pub use config::*;
pub use countdown::*;
pub use manual_clock::*;
pub use observer::*;
pub use scoring::*;
pub use session::*;
