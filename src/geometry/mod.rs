/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : 窗口几何计算（输出尺寸 + 填充拆分）
 *
 * 设计决策：
 * - 填充模式用带载荷的枚举`PaddingMode`表达，而非“bool + 两个整数”贯穿所有调用：
 *   match穷尽性保证Explicit/Same两个分支互斥且各自必然返回，不存在死代码分支
 * - 显式模式下整除性被破坏属于调用方bug，立即报错并给出轴向与非整数商，
 *   绝不静默取整（取整会改变推理语义）
 * - SAME模式的总填充按“小的一半放上/左”拆分：padTop = totalPad / 2（向下取整）
 */

use crate::errors::{ConvError, SpatialAxis};

/// 填充模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// 显式填充：调用方给定(padH, padW)，输出尺寸按floor公式推导，
    /// 且要求`(in - kernel + 2*pad) % stride == 0`严格成立
    Explicit { pad_h: usize, pad_w: usize },
    /// SAME填充：输出尺寸为`ceil(in / stride)`，填充量反推而来
    Same,
}

/// 某次调用的窗口几何：核、步长、填充拆分与输出尺寸。
///
/// 每次调用由[`WindowGeometry::compute`]重新计算，算出后不可变；
/// 不携带任何跨调用的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub kernel_h: usize,
    pub kernel_w: usize,
    pub stride_h: usize,
    pub stride_w: usize,
    pub pad_top: usize,
    pub pad_left: usize,
    pub out_h: usize,
    pub out_w: usize,
    /// 输入空间尺寸（保留用于推导pad_bottom/pad_right及越界判定）
    pub in_h: usize,
    pub in_w: usize,
}

impl WindowGeometry {
    /// 由输入空间尺寸、核、步长与填充模式计算完整窗口几何。
    ///
    /// # 参数
    /// - `kernel`: (kH, kW)
    /// - `stride`: (sH, sW)
    ///
    /// # 错误
    /// - 核或步长为0、显式模式下核超出填充后输入、或整除性被破坏时，
    ///   返回[`ConvError::InvalidGeometry`]（含轴向诊断）
    pub fn compute(
        in_h: usize,
        in_w: usize,
        kernel: (usize, usize),
        stride: (usize, usize),
        mode: PaddingMode,
    ) -> Result<Self, ConvError> {
        let (kernel_h, kernel_w) = kernel;
        let (stride_h, stride_w) = stride;

        let ((out_h, pad_top), (out_w, pad_left)) = match mode {
            PaddingMode::Explicit { pad_h, pad_w } => (
                explicit_axis(SpatialAxis::Height, in_h, kernel_h, stride_h, pad_h)?,
                explicit_axis(SpatialAxis::Width, in_w, kernel_w, stride_w, pad_w)?,
            ),
            PaddingMode::Same => (
                same_axis(SpatialAxis::Height, in_h, kernel_h, stride_h)?,
                same_axis(SpatialAxis::Width, in_w, kernel_w, stride_w)?,
            ),
        };

        Ok(Self {
            kernel_h,
            kernel_w,
            stride_h,
            stride_w,
            pad_top,
            pad_left,
            out_h,
            out_w,
            in_h,
            in_w,
        })
    }

    /// 高度方向的总填充量：`max(0, (outH-1)*sH + kH - inH)`
    pub fn total_pad_h(&self) -> usize {
        ((self.out_h - 1) * self.stride_h + self.kernel_h).saturating_sub(self.in_h)
    }

    /// 宽度方向的总填充量：`max(0, (outW-1)*sW + kW - inW)`
    pub fn total_pad_w(&self) -> usize {
        ((self.out_w - 1) * self.stride_w + self.kernel_w).saturating_sub(self.in_w)
    }

    /// 下方填充量（总填充减去上方的一半，可能比`pad_top`大1）
    pub fn pad_bottom(&self) -> usize {
        self.total_pad_h() - self.pad_top
    }

    /// 右方填充量
    pub fn pad_right(&self) -> usize {
        self.total_pad_w() - self.pad_left
    }

    /// 输出张量在(oy, ox, ky, kx)处对应的输入坐标（可能越界为负或超出输入范围）
    #[inline]
    pub(crate) fn input_coord(&self, oy: usize, ox: usize, ky: usize, kx: usize) -> (isize, isize) {
        let iy = (oy * self.stride_h + ky) as isize - self.pad_top as isize;
        let ix = (ox * self.stride_w + kx) as isize - self.pad_left as isize;
        (iy, ix)
    }

    /// 判断输入坐标是否在`[0, inH) x [0, inW)`内
    #[inline]
    pub(crate) fn in_bounds(&self, iy: isize, ix: isize) -> bool {
        iy >= 0 && iy < self.in_h as isize && ix >= 0 && ix < self.in_w as isize
    }
}

/// 单轴的输出尺寸计算（与[`WindowGeometry::compute`]同一套公式，供只关心一根轴的调用方使用）
pub fn out_size(
    axis: SpatialAxis,
    in_size: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
    same_mode: bool,
) -> Result<usize, ConvError> {
    let (out, _) = if same_mode {
        same_axis(axis, in_size, kernel, stride)?
    } else {
        explicit_axis(axis, in_size, kernel, stride, padding)?
    };
    Ok(out)
}

/// 显式模式单轴计算：返回(输出尺寸, 上/左填充（即调用方给定的填充）)
fn explicit_axis(
    axis: SpatialAxis,
    in_size: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
) -> Result<(usize, usize), ConvError> {
    check_positive(axis, in_size, kernel, stride)?;
    let padded = in_size + 2 * padding;
    if kernel > padded {
        return Err(ConvError::InvalidGeometry {
            axis,
            message: format!("核尺寸{kernel}超出填充后的输入范围(0, {padded}]"),
        });
    }
    let numerator = padded - kernel;
    if numerator % stride != 0 {
        // 商不是整数，放行会静默截断输出尺寸
        let quotient = numerator as f64 / stride as f64 + 1.0;
        return Err(ConvError::InvalidGeometry {
            axis,
            message: format!(
                "(输入{in_size} - 核{kernel} + 2*填充{padding})无法被步长{stride}整除（输出尺寸将为非整数的{quotient:.2}）"
            ),
        });
    }
    Ok((numerator / stride + 1, padding))
}

/// SAME模式单轴计算：返回(输出尺寸, 上/左填充)
fn same_axis(
    axis: SpatialAxis,
    in_size: usize,
    kernel: usize,
    stride: usize,
) -> Result<(usize, usize), ConvError> {
    check_positive(axis, in_size, kernel, stride)?;
    // ceil(in / stride)，实数除法后向上取整
    let out = in_size.div_ceil(stride);
    let total_pad = ((out - 1) * stride + kernel).saturating_sub(in_size);
    Ok((out, total_pad / 2))
}

fn check_positive(axis: SpatialAxis, in_size: usize, kernel: usize, stride: usize) -> Result<(), ConvError> {
    if in_size == 0 {
        return Err(ConvError::InvalidGeometry {
            axis,
            message: "输入尺寸须大于0".to_string(),
        });
    }
    if kernel == 0 {
        return Err(ConvError::InvalidGeometry {
            axis,
            message: "核尺寸须大于0".to_string(),
        });
    }
    if stride == 0 {
        return Err(ConvError::InvalidGeometry {
            axis,
            message: "步长须大于0".to_string(),
        });
    }
    Ok(())
}
