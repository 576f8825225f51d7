//! Game adapters bundled with the engine.

pub mod mnk;
