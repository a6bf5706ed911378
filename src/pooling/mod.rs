//! # 2D空间池化
//!
//! 对4D特征图`[batch, C, H, W]`按滑窗做归约，输出`[batch, C, outH, outW]`。
//! 窗口几何与[`crate::conv::im2col`]完全一致，二者的等价性
//! （先im2col再沿核轴归约 == 直接窗口归约）是本模块的正确性交叉校验。
//!
//! 越界（填充）位置永远不向MAX的取值集合或AVG/P-范数的分子贡献数值，
//! 只有[`DivisorPolicy::IncludePadding`]会让它们计入分母。

mod backward;
mod forward;


pub use self::backward::max_pool_backprop;
pub use self::forward::{pooling2d, pooling2d_into};

/// 池化归约类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolingKind {
    /// 窗口内（边界内位置的）最大值
    Max,
    /// 窗口内求和后除以分母（分母由[`DivisorPolicy`]决定）
    Average,
    /// `(Σ|v|^p / 分母)^(1/p)`，先取绝对值再乘方以保证对负输入良定义；
    /// p须为正整数
    PNorm { p: u32 },
}

/// 平均/p-范数池化的分母策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisorPolicy {
    /// 分母恒为`kH * kW`，填充位按0计入
    IncludePadding,
    /// 分母只数边界内的位置
    ExcludePadding,
}
