//! Built-in handlers served by the reference server.

pub mod poke;

pub use poke::PokeHandler;
