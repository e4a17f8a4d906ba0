// 电池电量估算（分段线性查表）

/// 校准点：电压 → 百分比
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationPoint {
    pub volts: f32,
    pub percent: f32,
}

impl CalibrationPoint {
    pub const fn new(volts: f32, percent: f32) -> Self {
        Self { volts, percent }
    }
}

/// 超出曲线范围时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutOfRange {
    /// 沿最外侧线段的斜率外推
    #[default]
    Extrapolate,
    /// 把输入电压限制在曲线范围内
    Clamp,
}

/// 曲线构造错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurveError {
    /// 至少需要两个点
    TooFewPoints,
    /// 电压必须严格递减（index 为第一个违规点）
    NotDescending { index: usize },
}

/// US18650GS (2200mAh) 放电曲线
pub const US18650GS_POINTS: [CalibrationPoint; 12] = [
    CalibrationPoint::new(4.20, 100.0),
    CalibrationPoint::new(4.00, 90.0),
    CalibrationPoint::new(3.87, 80.0),
    CalibrationPoint::new(3.82, 70.0),
    CalibrationPoint::new(3.80, 60.0),
    CalibrationPoint::new(3.75, 50.0),
    CalibrationPoint::new(3.70, 40.0),
    CalibrationPoint::new(3.65, 30.0),
    CalibrationPoint::new(3.60, 20.0),
    CalibrationPoint::new(3.55, 10.0),
    CalibrationPoint::new(3.50, 5.0),
    CalibrationPoint::new(3.20, 0.0),
];

/// 电池校准曲线
///
/// 点按电压从高到低排列，启动时确定，之后不再修改。
#[derive(Debug, Clone, Copy)]
pub struct BatteryCurve {
    points: &'static [CalibrationPoint],
    out_of_range: OutOfRange,
}

impl BatteryCurve {
    /// 默认曲线（编译期校验）
    pub const DEFAULT: BatteryCurve = match BatteryCurve::new(&US18650GS_POINTS) {
        Ok(curve) => curve,
        Err(_) => panic!("invalid built-in battery curve"),
    };

    /// 校验并创建曲线
    pub const fn new(points: &'static [CalibrationPoint]) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints);
        }

        let mut i = 1;
        while i < points.len() {
            if !(points[i].volts < points[i - 1].volts) {
                return Err(CurveError::NotDescending { index: i });
            }
            i += 1;
        }

        Ok(Self {
            points,
            out_of_range: OutOfRange::Extrapolate,
        })
    }

    /// 设置超范围策略
    pub const fn with_out_of_range(mut self, policy: OutOfRange) -> Self {
        self.out_of_range = policy;
        self
    }

    pub fn points(&self) -> &'static [CalibrationPoint] {
        self.points
    }

    pub fn out_of_range(&self) -> OutOfRange {
        self.out_of_range
    }

    /// 电压 → 电量百分比
    pub fn estimate(&self, volts: f32) -> f32 {
        let points = self.points;
        let last = points.len() - 1;

        let volts = match self.out_of_range {
            OutOfRange::Extrapolate => volts,
            OutOfRange::Clamp => volts.clamp(points[last].volts, points[0].volts),
        };

        // 从最高电压向下查找所在线段，找不到时落在最后一段
        let segment = (0..last)
            .find(|&i| volts >= points[i + 1].volts)
            .unwrap_or(last - 1);

        let hi = points[segment];
        let lo = points[segment + 1];
        let t = (volts - lo.volts) / (hi.volts - lo.volts);

        lo.percent + t * (hi.percent - lo.percent)
    }
}

impl Default for BatteryCurve {
    fn default() -> Self {
        Self::DEFAULT
    }
}
