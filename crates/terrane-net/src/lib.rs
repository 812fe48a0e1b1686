//! Wire messages exchanged between the world host and its clients.
#![forbid(unsafe_code)]

mod packet;
mod wire;

pub use packet::{CellChange, Packet, PacketTag};
pub use wire::PacketError;
