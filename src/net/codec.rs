// 串口链路编解码
use super::packet::{
    ADDR_LEN, HEADER_LEN, MAX_PAYLOAD_LEN, MAX_RADIO_FRAME, Packet, PacketError, PacketHeader,
    PacketType,
};
use super::transport::PeerAddress;
use heapless::Vec;

/// 单个链路包的最大字节数
pub const MAX_PACKET_LEN: usize = HEADER_LEN + MAX_PAYLOAD_LEN;

/// 编解码器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodecState {
    /// 等待头部
    WaitingHeader,
    /// 等待载荷
    WaitingPayload { header: PacketHeader },
}

/// 流式解码器
///
/// 串口字节可能被任意切分，`feed` 之后循环调用 `decode` 直到返回 `Ok(None)`。
pub struct PacketCodec {
    state: CodecState,
    buffer: Vec<u8, MAX_PACKET_LEN>,
}

impl PacketCodec {
    pub const fn new() -> Self {
        Self {
            state: CodecState::WaitingHeader,
            buffer: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.state = CodecState::WaitingHeader;
        self.buffer.clear();
    }

    /// 已缓存、尚未解码的字节数
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// 向缓冲区添加数据
    ///
    /// 溢出时丢弃全部缓存（包括本次数据）
    pub fn feed(&mut self, data: &[u8]) -> Result<(), CodecError> {
        if self.buffer.extend_from_slice(data).is_err() {
            warn!("Link codec buffer overflow, resetting");
            self.reset();
            return Err(CodecError::BufferOverflow);
        }
        Ok(())
    }

    /// 尝试解码一个完整的数据包
    ///
    /// 无效头部会被逐字节跳过（重新同步），不作为错误返回
    pub fn decode<'a>(
        &mut self,
        output_buf: &'a mut [u8],
    ) -> Result<Option<DecodedPacket<'a>>, CodecError> {
        loop {
            match self.state {
                CodecState::WaitingHeader => {
                    if self.buffer.len() < HEADER_LEN {
                        return Ok(None);
                    }

                    match PacketHeader::from_bytes(&self.buffer[..HEADER_LEN]) {
                        Ok(header) if header.payload_len as usize > MAX_PAYLOAD_LEN => {
                            warn!("Link payload too large: {}", header.payload_len);
                            self.consume(1);
                        }
                        Ok(header) => {
                            debug!(
                                "Link header: type={:?}, seq={}, len={}",
                                header.packet_type, header.seq, header.payload_len
                            );
                            self.consume(HEADER_LEN);
                            self.state = CodecState::WaitingPayload { header };
                        }
                        Err(e) => {
                            debug!("Link resync: {:?}", e);
                            self.consume(1);
                        }
                    }
                }

                CodecState::WaitingPayload { header } => {
                    let payload_len = header.payload_len as usize;

                    if self.buffer.len() < payload_len {
                        return Ok(None);
                    }

                    if output_buf.len() < payload_len {
                        self.reset();
                        return Err(CodecError::OutputBufferTooSmall);
                    }

                    output_buf[..payload_len].copy_from_slice(&self.buffer[..payload_len]);
                    self.consume(payload_len);
                    self.state = CodecState::WaitingHeader;

                    let packet = Packet {
                        header,
                        payload: &output_buf[..payload_len],
                    };

                    if let Err(e) = packet.verify() {
                        warn!("Link packet dropped: {:?}", e);
                        return Err(CodecError::InvalidPacket(e));
                    }

                    return Ok(Some(DecodedPacket {
                        packet_type: header.packet_type,
                        seq: header.seq,
                        payload: &output_buf[..payload_len],
                    }));
                }
            }
        }
    }

    /// 从缓冲区头部移除 n 个字节
    fn consume(&mut self, n: usize) {
        let n = n.min(self.buffer.len());
        let remaining = self.buffer.len() - n;
        self.buffer.as_mut_slice().copy_within(n.., 0);
        self.buffer.truncate(remaining);
    }

    /// 编码数据包到缓冲区，返回写入长度
    pub fn encode(
        packet_type: PacketType,
        seq: u8,
        payload: &[u8],
        output: &mut [u8],
    ) -> Result<usize, CodecError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(CodecError::PayloadTooLarge);
        }

        let total_len = HEADER_LEN + payload.len();
        if output.len() < total_len {
            return Err(CodecError::OutputBufferTooSmall);
        }

        let packet = Packet::new(packet_type, seq, payload);
        output[..HEADER_LEN].copy_from_slice(&packet.header.to_bytes());
        output[HEADER_LEN..total_len].copy_from_slice(payload);

        Ok(total_len)
    }

    /// 编码无载荷的包（Ping / Pong）
    pub fn encode_simple(
        packet_type: PacketType,
        seq: u8,
        output: &mut [u8],
    ) -> Result<usize, CodecError> {
        Self::encode(packet_type, seq, &[], output)
    }

    /// 编码 `地址 + 帧` 形式的包（AddPeer / Send）
    pub fn encode_addressed(
        packet_type: PacketType,
        seq: u8,
        peer: &PeerAddress,
        frame: &[u8],
        output: &mut [u8],
    ) -> Result<usize, CodecError> {
        if frame.len() > MAX_RADIO_FRAME {
            return Err(CodecError::PayloadTooLarge);
        }

        let mut payload = [0u8; MAX_PAYLOAD_LEN];
        payload[..ADDR_LEN].copy_from_slice(peer.as_bytes());
        payload[ADDR_LEN..ADDR_LEN + frame.len()].copy_from_slice(frame);

        Self::encode(packet_type, seq, &payload[..ADDR_LEN + frame.len()], output)
    }
}

impl Default for PacketCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// 解码后的数据包
#[derive(Debug)]
pub struct DecodedPacket<'a> {
    pub packet_type: PacketType,
    pub seq: u8,
    pub payload: &'a [u8],
}

/// 编解码错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// 缓冲区溢出
    BufferOverflow,
    /// 载荷太大
    PayloadTooLarge,
    /// 输出缓冲区太小
    OutputBufferTooSmall,
    /// 校验失败的数据包
    InvalidPacket(PacketError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(packet_type: PacketType, seq: u8, payload: &[u8]) -> std::vec::Vec<u8> {
        let mut out = [0u8; MAX_PACKET_LEN];
        let n = PacketCodec::encode(packet_type, seq, payload, &mut out).unwrap();
        out[..n].to_vec()
    }

    #[test]
    fn decodes_packet_split_across_feeds() {
        let bytes = encoded(PacketType::Receive, 3, &[1, 2, 3, 4, 5, 6, 7]);
        let mut codec = PacketCodec::new();
        let mut out = [0u8; MAX_PAYLOAD_LEN];

        codec.feed(&bytes[..5]).unwrap();
        assert!(codec.decode(&mut out).unwrap().is_none());

        codec.feed(&bytes[5..10]).unwrap();
        assert!(codec.decode(&mut out).unwrap().is_none());

        codec.feed(&bytes[10..]).unwrap();
        let packet = codec.decode(&mut out).unwrap().unwrap();
        assert_eq!(packet.packet_type, PacketType::Receive);
        assert_eq!(packet.seq, 3);
        assert_eq!(packet.payload, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(codec.buffered(), 0);
    }

    #[test]
    fn resyncs_after_garbage() {
        let mut stream = std::vec![0x00, 0xAA, 0x13, 0x55];
        stream.extend(encoded(PacketType::Pong, 9, &[]));

        let mut codec = PacketCodec::new();
        let mut out = [0u8; MAX_PAYLOAD_LEN];
        codec.feed(&stream).unwrap();

        let packet = codec.decode(&mut out).unwrap().unwrap();
        assert_eq!(packet.packet_type, PacketType::Pong);
        assert_eq!(packet.seq, 9);
    }

    #[test]
    fn two_packets_in_one_feed() {
        let mut stream = encoded(PacketType::SendStatus, 1, &[0]);
        stream.extend(encoded(PacketType::SendStatus, 2, &[1]));

        let mut codec = PacketCodec::new();
        let mut out = [0u8; MAX_PAYLOAD_LEN];
        codec.feed(&stream).unwrap();

        assert_eq!(codec.decode(&mut out).unwrap().unwrap().seq, 1);
        assert_eq!(codec.decode(&mut out).unwrap().unwrap().seq, 2);
        assert!(codec.decode(&mut out).unwrap().is_none());
    }

    #[test]
    fn corrupted_packet_is_reported_and_skipped() {
        let mut bad = encoded(PacketType::SendStatus, 1, &[0]);
        let last = bad.len() - 1;
        bad[last] ^= 0x01;
        bad.extend(encoded(PacketType::SendStatus, 2, &[0]));

        let mut codec = PacketCodec::new();
        let mut out = [0u8; MAX_PAYLOAD_LEN];
        codec.feed(&bad).unwrap();

        assert_eq!(
            codec.decode(&mut out).err(),
            Some(CodecError::InvalidPacket(PacketError::InvalidChecksum))
        );
        assert_eq!(codec.decode(&mut out).unwrap().unwrap().seq, 2);
    }

    #[test]
    fn overflow_resets_buffer() {
        let mut codec = PacketCodec::new();
        codec.feed(&[0u8; MAX_PACKET_LEN - 1]).unwrap();
        assert_eq!(codec.feed(&[0u8; 2]), Err(CodecError::BufferOverflow));
        assert_eq!(codec.buffered(), 0);
    }

    #[test]
    fn addressed_encoding_prefixes_peer() {
        let mut out = [0u8; MAX_PACKET_LEN];
        let n = PacketCodec::encode_addressed(
            PacketType::Send,
            4,
            &PeerAddress::BROADCAST,
            &[0x11; 18],
            &mut out,
        )
        .unwrap();
        assert_eq!(n, HEADER_LEN + ADDR_LEN + 18);
        assert_eq!(&out[HEADER_LEN..HEADER_LEN + ADDR_LEN], &[0xFF; 6]);

        let too_big = [0u8; MAX_RADIO_FRAME + 1];
        assert_eq!(
            PacketCodec::encode_addressed(PacketType::Send, 0, &PeerAddress::BROADCAST, &too_big, &mut out),
            Err(CodecError::PayloadTooLarge)
        );
    }
}
