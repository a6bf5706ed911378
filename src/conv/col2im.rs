/*
 * @Author       : 老董
 * @Date         : 2026-01-10
 * @Description  : col2im——im2col的伴随scatter-add
 *
 * 设计决策：
 * - 输出清零后，对列张量的每个元素按与im2col相同的坐标映射“累加”（而非覆盖）
 *   到输出：窗口重叠（stride < kernel）时多个列元素落到同一输出格，
 *   求和正是卷积反向传播所需的转置/伴随语义
 * - 浮点加法的求和顺序不保证跨实现逐位一致，重叠场景的测试须用容差比较
 * - 并行只按batch切分：不同batch样本不会写同一输出格；
 *   按输出窗口切分在scatter-add下是不安全的
 */

use ndarray::{Array4, ArrayView6};
use num_traits::Float;
use rayon::prelude::*;

/// 由6D列张量`[batch, C, outH, outW, kH, kW]`重建4D张量`[batch, C, H, W]`
/// （目标空间尺寸(H, W)由`out_hw`给定），重叠窗口的贡献相加。
///
/// 坐标映射与[`super::im2col`]一致：`iy = oy*sH - padH + ky`，
/// `ix = ox*sW - padW + kx`；越界（对应填充区）的列元素被丢弃。
///
/// # 参数
/// - `stride`: (sH, sW)
/// - `padding`: (padH, padW)
/// - `out_hw`: 目标空间尺寸(H, W)
pub fn col2im<F>(
    cols: &ArrayView6<'_, F>,
    stride: (usize, usize),
    padding: (usize, usize),
    out_hw: (usize, usize),
) -> Array4<F>
where
    F: Float + Send + Sync,
{
    let (batch_size, channels, out_h, out_w, kernel_h, kernel_w) = cols.dim();
    let (stride_h, stride_w) = stride;
    let (pad_h, pad_w) = padding;
    let (target_h, target_w) = out_hw;
    let single_sample_size = channels * target_h * target_w;

    // Rayon 并行处理每个 batch 样本
    let batch_results: Vec<Vec<F>> = (0..batch_size)
        .into_par_iter()
        .map(|n| {
            let mut sample_data = vec![F::zero(); single_sample_size];
            for c in 0..channels {
                for oy in 0..out_h {
                    for ox in 0..out_w {
                        for ky in 0..kernel_h {
                            for kx in 0..kernel_w {
                                let iy = (oy * stride_h + ky) as isize - pad_h as isize;
                                let ix = (ox * stride_w + kx) as isize - pad_w as isize;
                                if iy >= 0
                                    && iy < target_h as isize
                                    && ix >= 0
                                    && ix < target_w as isize
                                {
                                    let idx = c * target_h * target_w
                                        + iy as usize * target_w
                                        + ix as usize;
                                    sample_data[idx] =
                                        sample_data[idx] + cols[[n, c, oy, ox, ky, kx]];
                                }
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
    Array4::from_shape_vec((batch_size, channels, target_h, target_w), all_data).unwrap()
}
