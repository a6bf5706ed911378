/*
 * @Author       : 老董
 * @Date         : 2026-01-10
 * @Description  : im2col——把4D特征图展开为6D列张量
 *
 * 设计决策：
 * - 纯gather，无归约无累加：每个输出元素只依赖至多一个输入元素，
 *   因此可按任意方式切分并行；这里沿用batch维度的Rayon并行
 * - 越界（填充）位置严格写0，而不是跳过：列张量的每个窗口槽位都必须有定义
 * - `im2col_into`接受可变视图，调用方可以传入经permute的异步幅视图以复用内存
 */

use crate::errors::ConvError;
use crate::geometry::{PaddingMode, WindowGeometry};
use ndarray::{Array6, ArrayView4, ArrayViewMut6};
use num_traits::Float;
use rayon::prelude::*;

/// 将4D张量`[batch, C, H, W]`按滑窗展开为6D列张量`[batch, C, outH, outW, kH, kW]`。
///
/// 对每个(n, c, oy, ox, ky, kx)，源坐标为
/// `iy = oy*sH - padTop + ky`，`ix = ox*sW - padLeft + kx`；
/// 越界位置写入精确的0，否则写入`input[n, c, iy, ix]`。
///
/// # 参数
/// - `kernel`: (kH, kW)
/// - `stride`: (sH, sW)
/// - `mode`: 填充模式（显式填充或SAME）
pub fn im2col<F>(
    input: &ArrayView4<'_, F>,
    kernel: (usize, usize),
    stride: (usize, usize),
    mode: PaddingMode,
) -> Result<Array6<F>, ConvError>
where
    F: Float + Send + Sync,
{
    let (batch_size, channels, in_h, in_w) = input.dim();
    let geo = WindowGeometry::compute(in_h, in_w, kernel, stride, mode)?;
    let single_sample_size = channels * geo.out_h * geo.out_w * geo.kernel_h * geo.kernel_w;

    // Rayon 并行处理每个 batch 样本
    let batch_results: Vec<Vec<F>> = (0..batch_size)
        .into_par_iter()
        .map(|n| {
            let mut sample_data = vec![F::zero(); single_sample_size];
            let mut idx = 0;
            for c in 0..channels {
                for oy in 0..geo.out_h {
                    for ox in 0..geo.out_w {
                        for ky in 0..geo.kernel_h {
                            for kx in 0..geo.kernel_w {
                                let (iy, ix) = geo.input_coord(oy, ox, ky, kx);
                                if geo.in_bounds(iy, ix) {
                                    sample_data[idx] = input[[n, c, iy as usize, ix as usize]];
                                }
                                idx += 1;
                            }
                        }
                    }
                }
            }
            sample_data
        })
        .collect();

    // 合并结果
    let all_data: Vec<F> = batch_results.into_iter().flatten().collect();
    Ok(Array6::from_shape_vec(
        (
            batch_size,
            channels,
            geo.out_h,
            geo.out_w,
            geo.kernel_h,
            geo.kernel_w,
        ),
        all_data,
    )
    .unwrap())
}

/// [`im2col`]的写入调用方缓冲版本：`out`的形状必须恰好是
/// `[batch, C, outH, outW, kH, kW]`，否则返回[`ConvError::ShapeMismatch`]。
///
/// `out`可以是经permute/切片得到的异步幅视图（如把列张量组织成
/// `[batch, C, kH, kW, outH, outW]`再permute回来），写入按逻辑坐标进行。
pub fn im2col_into<F>(
    input: &ArrayView4<'_, F>,
    kernel: (usize, usize),
    stride: (usize, usize),
    mode: PaddingMode,
    out: &mut ArrayViewMut6<'_, F>,
) -> Result<(), ConvError>
where
    F: Float,
{
    let (batch_size, channels, in_h, in_w) = input.dim();
    let geo = WindowGeometry::compute(in_h, in_w, kernel, stride, mode)?;

    let expected = [
        batch_size,
        channels,
        geo.out_h,
        geo.out_w,
        geo.kernel_h,
        geo.kernel_w,
    ];
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
                    for ky in 0..geo.kernel_h {
                        for kx in 0..geo.kernel_w {
                            let (iy, ix) = geo.input_coord(oy, ox, ky, kx);
                            // 缓冲可能是脏的，填充位也要显式写0
                            out[[n, c, oy, ox, ky, kx]] = if geo.in_bounds(iy, ix) {
                                input[[n, c, iy as usize, ix as usize]]
                            } else {
                                F::zero()
                            };
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
