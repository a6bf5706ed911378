use std::fmt::{self, Display};

/// 2D空间轴（用于几何错误的诊断信息）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialAxis {
    Height,
    Width,
}
impl Display for SpatialAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis_name = match self {
            SpatialAxis::Height => "高度",
            SpatialAxis::Width => "宽度",
        };
        write!(f, "{}", axis_name)
    }
}
