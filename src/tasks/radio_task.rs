// 无线模块串口链路
//
// MCU 与 ESP-NOW 协处理器之间走 USART2，链路帧格式见 button_node::net::packet：
// - 启动：Ping/Pong 握手 → AddPeer 注册广播对端
// - 接收：Receive → Event::RadioFrame，SendStatus → Event::Delivery
// - 发送：发送队列中的帧 → Send，写失败 → Event::Delivery(Failure)
use crate::drivers::radio::OutboundReceiver;
use button_node::config::NodeConfig;
use button_node::event::{Event, EventSender};
use button_node::net::{
    DeliveryStatus, MAX_PACKET_LEN, PacketCodec, PacketType, PeerAddress, split_addressed,
};
use button_node::NodeError;
use defmt::{debug, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_stm32::mode::Async;
use embassy_stm32::usart::{UartRx, UartTx};
use embassy_time::Timer;

/// 串口读缓冲区
const RX_CHUNK: usize = 64;

/// 握手并注册对端
///
/// 失败即 TransportInit：调用方记录后停止工作，不重试
pub async fn init_modem(
    tx: &mut UartTx<'static, Async>,
    rx: &mut UartRx<'static, Async>,
    config: &NodeConfig,
) -> Result<(), NodeError> {
    info!("Initializing radio modem");

    let mut out = [0u8; MAX_PACKET_LEN];
    let n = PacketCodec::encode_simple(PacketType::Ping, 0, &mut out)?;
    tx.write(&out[..n]).await.map_err(|_| NodeError::TransportInit)?;

    match select(wait_for_pong(rx), Timer::after(config.modem_init_timeout)).await {
        Either::First(Ok(())) => info!("Radio modem answered"),
        Either::First(Err(e)) => return Err(e),
        Either::Second(()) => {
            error!("Radio modem did not answer within {} ms", config.modem_init_timeout.as_millis());
            return Err(NodeError::TransportInit);
        }
    }

    register_peer(tx, &config.peer).await
}

async fn wait_for_pong(rx: &mut UartRx<'static, Async>) -> Result<(), NodeError> {
    let mut codec = PacketCodec::new();
    let mut chunk = [0u8; RX_CHUNK];
    let mut decode_buffer = [0u8; MAX_PACKET_LEN];

    loop {
        let n = rx
            .read_until_idle(&mut chunk)
            .await
            .map_err(|_| NodeError::TransportInit)?;

        if codec.feed(&chunk[..n]).is_err() {
            continue;
        }

        loop {
            match codec.decode(&mut decode_buffer) {
                Ok(Some(packet)) if packet.packet_type == PacketType::Pong => return Ok(()),
                Ok(Some(packet)) => debug!("Ignoring {:?} during handshake", packet.packet_type),
                Ok(None) => break,
                Err(_) => continue,
            }
        }
    }
}

async fn register_peer(
    tx: &mut UartTx<'static, Async>,
    peer: &PeerAddress,
) -> Result<(), NodeError> {
    let mut out = [0u8; MAX_PACKET_LEN];
    let n = PacketCodec::encode_addressed(PacketType::AddPeer, 0, peer, &[], &mut out)?;
    tx.write(&out[..n]).await.map_err(|_| NodeError::TransportInit)?;

    info!("Peer registered: {:?}", peer);
    Ok(())
}

/// 接收任务：串口字节流 → 事件
#[embassy_executor::task]
pub async fn radio_rx_task(mut rx: UartRx<'static, Async>, event_tx: EventSender) -> ! {
    info!("Radio rx task started");

    let mut codec = PacketCodec::new();
    let mut chunk = [0u8; RX_CHUNK];
    let mut decode_buffer = [0u8; MAX_PACKET_LEN];

    loop {
        let n = match rx.read_until_idle(&mut chunk).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                codec.reset();
                continue;
            }
        };

        if let Err(e) = codec.feed(&chunk[..n]) {
            warn!("Link codec feed error: {:?}", e);
            continue;
        }

        loop {
            let packet = match codec.decode(&mut decode_buffer) {
                Ok(Some(packet)) => packet,
                Ok(None) => break,
                Err(e) => {
                    warn!("Link decode error: {:?}", e);
                    continue;
                }
            };

            match packet.packet_type {
                PacketType::Receive => match split_addressed(packet.payload) {
                    Ok((sender, frame)) => match Event::radio_frame(sender, frame) {
                        Ok(event) => {
                            if event_tx.try_send(event).is_err() {
                                warn!("Event queue full, radio frame dropped");
                            }
                        }
                        Err(e) => warn!("Radio frame dropped: {:?}", e),
                    },
                    Err(e) => warn!("Bad Receive packet: {:?}", e),
                },
                PacketType::SendStatus => {
                    let status = match packet.payload.first() {
                        Some(&code) => DeliveryStatus::from_u8(code),
                        None => DeliveryStatus::Failure,
                    };
                    if event_tx.try_send(Event::Delivery(status)).is_err() {
                        warn!("Event queue full, delivery status dropped");
                    }
                }
                PacketType::Error => warn!("Radio modem reported error: {=[u8]}", packet.payload),
                other => debug!("Unexpected link packet {:?}", other),
            }
        }
    }
}

/// 发送任务：发送队列 → 串口
///
/// 编码或写串口失败时帧已丢失，按投递失败上报
#[embassy_executor::task]
pub async fn radio_tx_task(
    mut tx: UartTx<'static, Async>,
    outbound: OutboundReceiver,
    event_tx: EventSender,
) -> ! {
    info!("Radio tx task started");

    let mut seq: u8 = 1;
    let mut out = [0u8; MAX_PACKET_LEN];

    loop {
        let item = outbound.receive().await;

        let written = match PacketCodec::encode_addressed(PacketType::Send, seq, &item.peer, &item.frame, &mut out) {
            Ok(n) => match tx.write(&out[..n]).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("UART write error: {:?}", e);
                    false
                }
            },
            Err(e) => {
                warn!("Link encode error: {:?}", e);
                false
            }
        };

        if !written && event_tx.try_send(Event::link_failure()).is_err() {
            warn!("Event queue full, delivery status dropped");
        }

        seq = seq.wrapping_add(1);
    }
}
