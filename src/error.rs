// 错误定义
use crate::net::codec::CodecError;
use crate::net::transport::TransportError;
use crate::telemetry::battery::CurveError;
use crate::telemetry::message::WireError;

/// 结果类型
pub type Result<T> = core::result::Result<T, NodeError>;

/// 错误类型
///
/// 去抖抑制不是错误，见 [`crate::app::gate::GateDecision`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeError {
    /// 无线模块初始化失败（启动时致命）
    TransportInit,
    /// 发送被传输层拒绝，事件丢失
    SendFailed(TransportError),
    /// 收到的数据长度与线格式不符
    MalformedReceive { len: usize },
    /// 电池曲线无效
    InvalidCurve(CurveError),
    /// 串口链路编解码错误
    Link(CodecError),
}

impl From<TransportError> for NodeError {
    fn from(e: TransportError) -> Self {
        NodeError::SendFailed(e)
    }
}

impl From<WireError> for NodeError {
    fn from(e: WireError) -> Self {
        match e {
            WireError::Length { actual, .. } => NodeError::MalformedReceive { len: actual },
        }
    }
}

impl From<CurveError> for NodeError {
    fn from(e: CurveError) -> Self {
        NodeError::InvalidCurve(e)
    }
}

impl From<CodecError> for NodeError {
    fn from(e: CodecError) -> Self {
        NodeError::Link(e)
    }
}
