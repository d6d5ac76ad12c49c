pub mod compression;
pub mod error;
pub mod factory;
pub mod types;

pub use compression::{compressed_size, compression_ratio};
pub use error::{PacketError, PacketResult};
pub use factory::PacketFactory;
pub use types::{Packet, PacketId, PacketStatus, PacketType};
