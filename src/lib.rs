//! # Only Conv
//!
//! `only_conv`是[only_torch](https://github.com/dbsxdbsx/only_torch)的姊妹库，
//! 提供卷积神经网络中性能关键的2D卷积支撑原语：
//! - `im2col`/`col2im`：滑窗区域与列布局之间的稠密重排（使卷积可表达为矩阵乘法）；
//! - `pooling2d`：最大/平均/p-范数三种2D空间池化；
//! - `max_pool_backprop`：最大池化的反向传播。
//!
//! 张量存储由外部的[ndarray](https://docs.rs/ndarray)承担（固定阶、按元素类型泛化），
//! 本库只做窗口几何计算、稠密重排与窗口归约，不持有任何跨调用状态，也不做任何I/O。

pub mod conv;
pub mod errors;
pub mod geometry;
pub mod pooling;
pub mod utils;

pub use conv::{col2im, im2col, im2col_into};
pub use errors::{ConvError, SpatialAxis};
pub use geometry::{PaddingMode, WindowGeometry, out_size};
pub use pooling::{DivisorPolicy, PoolingKind, max_pool_backprop, pooling2d, pooling2d_into};
