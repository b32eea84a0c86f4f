//! Actor system: the chat controller and the components it drives.

pub mod backend;
pub mod controller;
pub mod feedback;
pub mod gateway;
pub mod messages;
pub mod store;
pub mod traits;
