//! # im2col / col2im
//!
//! 滑窗区域与列布局之间的稠密重排。列张量统一采用
//! `[batch, channel, outH, outW, kH, kW]`布局：前四维对齐池化输出，
//! 后两维恰好是窗口内的核偏移，沿核轴归约即可复现池化结果。
//!
//! 二者互为伴随：`im2col`是纯gather（填充位写0），`col2im`是scatter-add。
//! 仅当窗口互不重叠（kernel == stride且无填充）时二者互逆；
//! 窗口重叠时`col2im`会把重叠贡献求和——这正是卷积反向传播需要的语义，不是bug。

mod col2im;
mod im2col;

#[cfg(test)]
pub mod tests;

pub use self::col2im::col2im;
pub use self::im2col::{im2col, im2col_into};
