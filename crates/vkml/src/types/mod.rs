//! Node structs for every kind in the document graph, grouped by schema
//! category, plus the attribute token tables in [`enums`].

mod binding;
mod command;
mod device;
mod enums;
mod frame;
mod memory;
mod pipeline;
mod present;
mod xr;

pub use binding::*;
pub use command::*;
pub use device::*;
pub use enums::*;
pub use frame::*;
pub use memory::*;
pub use pipeline::*;
pub use present::*;
pub use xr::*;
