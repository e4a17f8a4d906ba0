// 串口链路包格式（MCU ↔ 无线模块）
use super::transport::PeerAddress;

/// 链路包头部长度（字节）
pub const HEADER_LEN: usize = 8;

/// 无线帧最大长度（ESP-NOW 上限）
pub const MAX_RADIO_FRAME: usize = 250;

/// 地址字段长度
pub const ADDR_LEN: usize = 6;

/// 链路包最大载荷长度：地址 + 无线帧
pub const MAX_PAYLOAD_LEN: usize = ADDR_LEN + MAX_RADIO_FRAME;

/// 链路包类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PacketType {
    /// 握手请求
    Ping = 0x01,
    /// 握手应答
    Pong = 0x02,
    /// 注册对端（载荷：6 字节地址）
    AddPeer = 0x10,
    /// 发送无线帧（载荷：6 字节地址 + 帧）
    Send = 0x11,
    /// 发送结果（载荷：1 字节，0 = 成功）
    SendStatus = 0x12,
    /// 收到无线帧（载荷：6 字节发送方地址 + 帧）
    Receive = 0x13,
    /// 模块报错
    Error = 0xFF,
}

impl PacketType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Ping),
            0x02 => Some(Self::Pong),
            0x10 => Some(Self::AddPeer),
            0x11 => Some(Self::Send),
            0x12 => Some(Self::SendStatus),
            0x13 => Some(Self::Receive),
            0xFF => Some(Self::Error),
            _ => None,
        }
    }
}

/// 链路包头部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketHeader {
    /// 魔数 0xAA55
    pub magic: u16,
    /// 包类型
    pub packet_type: PacketType,
    /// 序列号
    pub seq: u8,
    /// 载荷长度
    pub payload_len: u16,
    /// 校验和（简单累加）
    pub checksum: u16,
}

impl PacketHeader {
    pub const MAGIC: u16 = 0xAA55;

    pub fn new(packet_type: PacketType, seq: u8, payload_len: u16) -> Self {
        Self {
            magic: Self::MAGIC,
            packet_type,
            seq,
            payload_len,
            checksum: 0,
        }
    }

    /// 从字节数组解析头部
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() < HEADER_LEN {
            return Err(PacketError::InvalidLength);
        }

        let magic = u16::from_be_bytes([bytes[0], bytes[1]]);
        if magic != Self::MAGIC {
            return Err(PacketError::InvalidMagic);
        }

        let packet_type = PacketType::from_u8(bytes[2]).ok_or(PacketError::InvalidType)?;

        Ok(Self {
            magic,
            packet_type,
            seq: bytes[3],
            payload_len: u16::from_be_bytes([bytes[4], bytes[5]]),
            checksum: u16::from_be_bytes([bytes[6], bytes[7]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..2].copy_from_slice(&self.magic.to_be_bytes());
        bytes[2] = self.packet_type as u8;
        bytes[3] = self.seq;
        bytes[4..6].copy_from_slice(&self.payload_len.to_be_bytes());
        bytes[6..8].copy_from_slice(&self.checksum.to_be_bytes());
        bytes
    }

    /// 计算校验和：头部字段（不含 checksum）+ 载荷逐字节累加，折叠为 16 位
    pub fn calculate_checksum(&self, payload: &[u8]) -> u16 {
        let mut sum: u32 = self.magic as u32
            + self.packet_type as u32
            + self.seq as u32
            + self.payload_len as u32;

        for &byte in payload {
            sum += byte as u32;
        }

        while sum > 0xFFFF {
            sum = (sum & 0xFFFF) + (sum >> 16);
        }

        sum as u16
    }

    pub fn verify_checksum(&self, payload: &[u8]) -> bool {
        self.checksum == self.calculate_checksum(payload)
    }
}

/// 完整的链路包
#[derive(Debug, Clone)]
pub struct Packet<'a> {
    pub header: PacketHeader,
    pub payload: &'a [u8],
}

impl<'a> Packet<'a> {
    /// 创建数据包并填好校验和
    pub fn new(packet_type: PacketType, seq: u8, payload: &'a [u8]) -> Self {
        let mut header = PacketHeader::new(packet_type, seq, payload.len() as u16);
        header.checksum = header.calculate_checksum(payload);

        Self { header, payload }
    }

    pub fn verify(&self) -> Result<(), PacketError> {
        if self.header.magic != PacketHeader::MAGIC {
            return Err(PacketError::InvalidMagic);
        }

        if self.payload.len() != self.header.payload_len as usize {
            return Err(PacketError::InvalidLength);
        }

        if !self.header.verify_checksum(self.payload) {
            return Err(PacketError::InvalidChecksum);
        }

        Ok(())
    }
}

/// 拆分 `地址 + 帧` 形式的载荷（Send / Receive）
pub fn split_addressed(payload: &[u8]) -> Result<(PeerAddress, &[u8]), PacketError> {
    if payload.len() < ADDR_LEN || payload.len() > MAX_PAYLOAD_LEN {
        return Err(PacketError::InvalidLength);
    }

    let mut addr = [0u8; ADDR_LEN];
    addr.copy_from_slice(&payload[..ADDR_LEN]);
    Ok((PeerAddress(addr), &payload[ADDR_LEN..]))
}

/// 链路包错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// 无效的魔数
    InvalidMagic,
    /// 无效的包类型
    InvalidType,
    /// 无效的长度
    InvalidLength,
    /// 校验和错误
    InvalidChecksum,
}
