/*
 * @Author       : 老董
 * @Date         : 2026-01-12
 * @Description  : 2D池化前向——最大/平均/p-范数三种窗口归约
 *
 * 设计决策：
 * - 单个窗口的归约收敛在`reduce_window`中，分配版与写缓冲版共用同一套语义，
 *   不存在两份会漂移的实现
 * - MAX遇到整窗落入填充区（退化窗口）立即报错：空集合上没有最大值；
 *   AVG/P-范数在IncludePadding下对退化窗口输出0，在ExcludePadding下
 *   分母为0，同样按退化窗口报错
 * - dilation参数按原接口保留但仅接受(1, 1)
 *   TODO: 支持dilation > 1（需要把input_coord的核偏移乘上膨胀系数并放宽几何校验）
 */

use crate::errors::ConvError;
use crate::geometry::{PaddingMode, WindowGeometry};
use crate::pooling::{DivisorPolicy, PoolingKind};
use ndarray::{Array4, ArrayView4, ArrayViewMut4};
use num_traits::Float;
use rayon::prelude::*;

/// 对4D张量`[batch, C, H, W]`做2D空间池化，返回`[batch, C, outH, outW]`。
///
/// # 参数
/// - `kernel`: (kH, kW)
/// - `stride`: (sH, sW)
/// - `dilation`: 目前仅支持(1, 1)，其余值返回[`ConvError::UnsupportedDilation`]
/// - `mode`: 填充模式
/// - `kind`: 归约类型（最大/平均/p-范数）
/// - `divisor`: 平均与p-范数的分母策略（对MAX无效）
pub fn pooling2d<F>(
    input: &ArrayView4<'_, F>,
    kernel: (usize, usize),
    stride: (usize, usize),
    dilation: (usize, usize),
    mode: PaddingMode,
    kind: PoolingKind,
    divisor: DivisorPolicy,
) -> Result<Array4<F>, ConvError>
where
    F: Float + Send + Sync,
{
    let geo = validate(input, kernel, stride, dilation, mode, kind)?;
    let (batch_size, channels, _, _) = input.dim();
    let single_sample_size = channels * geo.out_h * geo.out_w;

    // Rayon 并行处理每个 batch 样本
    let batch_results: Vec<Vec<F>> = (0..batch_size)
        .into_par_iter()
        .map(|n| -> Result<Vec<F>, ConvError> {
            let mut sample_data = vec![F::zero(); single_sample_size];
            let mut idx = 0;
            for c in 0..channels {
                for oy in 0..geo.out_h {
                    for ox in 0..geo.out_w {
                        sample_data[idx] = reduce_window(input, &geo, kind, divisor, n, c, oy, ox)?;
                        idx += 1;
                    }
                }
            }
            Ok(sample_data)
        })
        .collect::<Result<Vec<_>, ConvError>>()?;

    // 合并结果
    let all_data: Vec<F> = batch_results.into_iter().flatten().collect();
    Ok(Array4::from_shape_vec((batch_size, channels, geo.out_h, geo.out_w), all_data).unwrap())
}

/// [`pooling2d`]的写入调用方缓冲版本：`out`形状必须恰好是
/// `[batch, C, outH, outW]`，否则返回[`ConvError::ShapeMismatch`]。
#[allow(clippy::too_many_arguments)]
pub fn pooling2d_into<F>(
    input: &ArrayView4<'_, F>,
    kernel: (usize, usize),
    stride: (usize, usize),
    dilation: (usize, usize),
    mode: PaddingMode,
    kind: PoolingKind,
    divisor: DivisorPolicy,
    out: &mut ArrayViewMut4<'_, F>,
) -> Result<(), ConvError>
where
    F: Float,
{
    let geo = validate(input, kernel, stride, dilation, mode, kind)?;
    let (batch_size, channels, _, _) = input.dim();

    let expected = [batch_size, channels, geo.out_h, geo.out_w];
    if out.shape() != expected {
        return Err(ConvError::ShapeMismatch {
            expected: expected.to_vec(),
            got: out.shape().to_vec(),
        });
    }

    for n in 0..batch_size {
        for c in 0..channels {
            for oy in 0..geo.out_h {
                for ox in 0..geo.out_w {
                    out[[n, c, oy, ox]] = reduce_window(input, &geo, kind, divisor, n, c, oy, ox)?;
                }
            }
        }
    }
    Ok(())
}

/// 公共参数校验：dilation、p的正整数约束与窗口几何
fn validate<F>(
    input: &ArrayView4<'_, F>,
    kernel: (usize, usize),
    stride: (usize, usize),
    dilation: (usize, usize),
    mode: PaddingMode,
    kind: PoolingKind,
) -> Result<WindowGeometry, ConvError>
where
    F: Float,
{
    if dilation != (1, 1) {
        return Err(ConvError::UnsupportedDilation {
            dil_h: dilation.0,
            dil_w: dilation.1,
        });
    }
    if let PoolingKind::PNorm { p: 0 } = kind {
        return Err(ConvError::InvalidPNorm { p: 0 });
    }
    let (_, _, in_h, in_w) = input.dim();
    WindowGeometry::compute(in_h, in_w, kernel, stride, mode)
}

/// 单个窗口的归约：只收集边界内的值，越界位置从不贡献数值。
/// 分配版与缓冲版都经由此函数，保证两条路径语义一致。
#[allow(clippy::too_many_arguments)]
fn reduce_window<F>(
    input: &ArrayView4<'_, F>,
    geo: &WindowGeometry,
    kind: PoolingKind,
    divisor: DivisorPolicy,
    n: usize,
    c: usize,
    oy: usize,
    ox: usize,
) -> Result<F, ConvError>
where
    F: Float,
{
    match kind {
        PoolingKind::Max => {
            let mut max: Option<F> = None;
            for ky in 0..geo.kernel_h {
                for kx in 0..geo.kernel_w {
                    let (iy, ix) = geo.input_coord(oy, ox, ky, kx);
                    if !geo.in_bounds(iy, ix) {
                        continue;
                    }
                    let v = input[[n, c, iy as usize, ix as usize]];
                    max = Some(match max {
                        Some(m) if m >= v => m,
                        _ => v,
                    });
                }
            }
            max.ok_or(ConvError::DegenerateWindow { n, c, oy, ox })
        }
        PoolingKind::Average => {
            let (sum, count) = window_sum(input, geo, n, c, oy, ox, |v| v);
            let denom = denominator(geo, divisor, count)
                .ok_or(ConvError::DegenerateWindow { n, c, oy, ox })?;
            Ok(sum / denom)
        }
        PoolingKind::PNorm { p } => {
            let (sum, count) = window_sum(input, geo, n, c, oy, ox, |v| v.abs().powi(p as i32));
            let denom = denominator(geo, divisor, count)
                .ok_or(ConvError::DegenerateWindow { n, c, oy, ox })?;
            Ok((sum / denom).powf(F::one() / F::from(p).unwrap()))
        }
    }
}

/// 窗口内边界内位置的映射求和，返回(和, 边界内位置数)
fn window_sum<F>(
    input: &ArrayView4<'_, F>,
    geo: &WindowGeometry,
    n: usize,
    c: usize,
    oy: usize,
    ox: usize,
    map: impl Fn(F) -> F,
) -> (F, usize)
where
    F: Float,
{
    let mut sum = F::zero();
    let mut count = 0;
    for ky in 0..geo.kernel_h {
        for kx in 0..geo.kernel_w {
            let (iy, ix) = geo.input_coord(oy, ox, ky, kx);
            if geo.in_bounds(iy, ix) {
                sum = sum + map(input[[n, c, iy as usize, ix as usize]]);
                count += 1;
            }
        }
    }
    (sum, count)
}

/// 分母策略：ExcludePadding下整窗越界（count == 0）没有合法分母
fn denominator<F>(geo: &WindowGeometry, divisor: DivisorPolicy, count: usize) -> Option<F>
where
    F: Float,
{
    match divisor {
        DivisorPolicy::IncludePadding => F::from(geo.kernel_h * geo.kernel_w),
        DivisorPolicy::ExcludePadding if count == 0 => None,
        DivisorPolicy::ExcludePadding => F::from(count),
    }
}
