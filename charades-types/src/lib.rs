pub mod category;
pub mod errors;
pub mod game;
pub mod messages;
pub mod players;

// Re-export all types
pub use category::*;
pub use errors::*;
pub use game::*;
pub use messages::*;
pub use players::*;
