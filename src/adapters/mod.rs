// Adapters layer: concrete implementations of the domain ports.

pub mod system;
pub mod terminal;

pub use system::SystemToolchain;
pub use terminal::TerminalConsole;
