// 节点配置
use crate::net::PeerAddress;
use crate::telemetry::OutOfRange;
use embassy_time::Duration;

/// 两次按键触发之间的最小间隔（毫秒）
pub const TIME_BETWEEN_TRIGGERS_MS: u64 = 3000;

/// 连接检查应答的来源过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeFilter {
    /// 任何发送方的检查都应答（广播寻址下无法区分来源）
    #[default]
    AnySender,
    /// 只应答配置的对端地址
    PeerOnly,
}

/// 节点配置
#[derive(Debug, Clone, Copy)]
pub struct NodeConfig {
    /// 去抖窗口
    pub min_trigger_interval: Duration,
    /// 对端地址
    pub peer: PeerAddress,
    /// 连接检查来源过滤
    pub probe_filter: ProbeFilter,
    /// 电池电压超出曲线范围时的处理
    pub battery_out_of_range: OutOfRange,
    /// 无线模块握手超时
    pub modem_init_timeout: Duration,
    /// ADC 参考电压（V）
    pub adc_vref: f32,
    /// 电池分压比
    pub battery_divider: f32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            min_trigger_interval: Duration::from_millis(TIME_BETWEEN_TRIGGERS_MS),
            peer: PeerAddress::BROADCAST,
            probe_filter: ProbeFilter::AnySender,
            battery_out_of_range: OutOfRange::Extrapolate,
            modem_init_timeout: Duration::from_secs(1),
            adc_vref: 3.3,
            battery_divider: 2.0,
        }
    }
}

impl ProbeFilter {
    /// 是否应答来自 `sender` 的检查
    pub fn accepts(&self, sender: &PeerAddress, peer: &PeerAddress) -> bool {
        match self {
            ProbeFilter::AnySender => true,
            ProbeFilter::PeerOnly => peer.is_broadcast() || sender == peer,
        }
    }
}
