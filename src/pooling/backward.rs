/*
 * @Author       : 老董
 * @Date         : 2026-01-12
 * @Description  : 最大池化反向传播——把输出梯度整份归还给窗口内的argmax
 *
 * 设计决策：
 * - 由前向输入“重扫”每个窗口找argmax，而不是缓存前向的索引：
 *   以少量重复计算换取零额外内存与无状态接口（缓存索引的实现只要结果
 *   逐位一致同样合法）
 * - 相同最大值取扫描序（ky外层、kx内层，均升序）首个出现的位置，
 *   比较用严格大于实现“首个获胜”
 * - 对输入格的写入是累加而非覆盖：窗口重叠时多个输出位置可能共享
 *   同一个argmax输入格
 * - 整窗落入填充区时静默跳过（无梯度贡献）——与前向MAX的报错刻意不对称
 */

use crate::errors::ConvError;
use crate::geometry::{PaddingMode, WindowGeometry};
use ndarray::{Array4, ArrayView4};
use num_traits::Float;
use rayon::prelude::*;

/// 最大池化的反向传播：把`grad_output[n, c, oy, ox]`累加到该窗口内
/// 取得最大值的输入位置上，返回与`input`同形状的梯度张量。
///
/// `grad_output`的形状必须与由`kernel`/`stride`/`mode`推出的输出几何
/// `[batch, C, outH, outW]`一致，否则返回[`ConvError::ShapeMismatch`]。
pub fn max_pool_backprop<F>(
    input: &ArrayView4<'_, F>,
    grad_output: &ArrayView4<'_, F>,
    kernel: (usize, usize),
    stride: (usize, usize),
    mode: PaddingMode,
) -> Result<Array4<F>, ConvError>
where
    F: Float + Send + Sync,
{
    let (batch_size, channels, in_h, in_w) = input.dim();
    let geo = WindowGeometry::compute(in_h, in_w, kernel, stride, mode)?;

    let expected = [batch_size, channels, geo.out_h, geo.out_w];
    if grad_output.shape() != expected {
        return Err(ConvError::ShapeMismatch {
            expected: expected.to_vec(),
            got: grad_output.shape().to_vec(),
        });
    }

    let single_sample_size = channels * in_h * in_w;

    // Rayon 并行处理每个 batch 样本（batch之间不共享输出格，scatter-add安全）
    let batch_results: Vec<Vec<F>> = (0..batch_size)
        .into_par_iter()
        .map(|n| {
            let mut sample_grad = vec![F::zero(); single_sample_size];
            for c in 0..channels {
                for oy in 0..geo.out_h {
                    for ox in 0..geo.out_w {
                        let mut max: Option<(F, usize, usize)> = None;
                        for ky in 0..geo.kernel_h {
                            for kx in 0..geo.kernel_w {
                                let (iy, ix) = geo.input_coord(oy, ox, ky, kx);
                                if !geo.in_bounds(iy, ix) {
                                    continue;
                                }
                                let (iy, ix) = (iy as usize, ix as usize);
                                let v = input[[n, c, iy, ix]];
                                // 严格大于：并列时首个扫描到的位置获胜
                                if max.is_none_or(|(m, _, _)| v > m) {
                                    max = Some((v, iy, ix));
                                }
                            }
                        }
                        // 整窗都是填充时无处可归还，静默跳过
                        if let Some((_, max_y, max_x)) = max {
                            let idx = c * in_h * in_w + max_y * in_w + max_x;
                            sample_grad[idx] = sample_grad[idx] + grad_output[[n, c, oy, ox]];
                        }
                    }
                }
            }
            sample_grad
        })
        .collect();

    // 合并结果
    let all_data: Vec<F> = batch_results.into_iter().flatten().collect();
    Ok(Array4::from_shape_vec((batch_size, channels, in_h, in_w), all_data).unwrap())
}
