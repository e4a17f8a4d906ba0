pub mod codec;
pub mod packet;
pub mod transport;

// 重新导出常用类型
pub use codec::{CodecError, DecodedPacket, PacketCodec, MAX_PACKET_LEN};
pub use packet::{Packet, PacketError, PacketHeader, PacketType, split_addressed};
pub use transport::{DeliveryStatus, PeerAddress, Transport, TransportError};
