use thiserror::Error;
mod axis;
pub use self::axis::*;

/// 卷积支撑原语的错误类型。
///
/// 所有错误均在出错操作的调用点立即报告，本库内部不做任何“纠正”——
/// 静默修正几何参数会改变推理语义，静默重分配输出缓冲会掩盖调用方的bug。
/// 出错时不返回任何部分结果。
#[derive(Error, Debug, PartialEq)]
pub enum ConvError {
    // 显式填充模式下，核/步长/填充与输入尺寸不兼容（整除性被破坏或核超出填充后输入）
    #[error("几何参数无效（{axis}方向）：{message}")]
    InvalidGeometry { axis: SpatialAxis, message: String },

    #[error("暂不支持的空洞（dilation）参数：({dil_h}, {dil_w})，目前仅支持(1, 1)")]
    UnsupportedDilation { dil_h: usize, dil_w: usize },

    #[error("p-范数池化的p须为正整数，得到{p}")]
    InvalidPNorm { p: u32 },

    // 调用方提供的输出缓冲（或上游梯度张量）形状错误，不会自动调整尺寸
    #[error("张量形状不匹配：期望{expected:?}，实际{got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    // 仅最大池化前向：整个窗口都落在填充区内，空集合上无法定义最大值。
    // 其反向传播对同样的窗口是静默跳过而非报错，这一不对称是刻意保留的语义
    #[error("池化窗口完全落在填充区内（batch={n}, channel={c}, 输出位置=({oy}, {ox})）")]
    DegenerateWindow {
        n: usize,
        c: usize,
        oy: usize,
        ox: usize,
    },
}
