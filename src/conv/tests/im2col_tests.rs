use crate::assert_err;
use crate::conv::{im2col, im2col_into};
use crate::errors::ConvError;
use crate::geometry::PaddingMode;
use ndarray::{Array4, Array6};

/// 1..=n 的等差数列，便于肉眼核对搬运后的元素位置
fn linspace_vec(n: usize) -> Vec<f64> {
    (1..=n).map(|v| v as f64).collect()
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓黄金用例↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
#[test]
fn test_im2col_golden_1x1_kernel_pad2() {
    // 输入(2,2,2,2)取值1..16，1x1核、步长1、显式填充2：
    // 每个(n,c)的6x6平面除(2,2)..(3,3)的2x2块外全为0
    let input = Array4::from_shape_vec((2, 2, 2, 2), linspace_vec(16)).unwrap();
    let cols = im2col(
        &input.view(),
        (1, 1),
        (1, 1),
        PaddingMode::Explicit { pad_h: 2, pad_w: 2 },
    )
    .unwrap();

    #[rustfmt::skip]
    let expected_data = vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 2.0, 0.0, 0.0,
        0.0, 0.0, 3.0, 4.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,

        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 5.0, 6.0, 0.0, 0.0,
        0.0, 0.0, 7.0, 8.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,

        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 9.0, 10.0, 0.0, 0.0,
        0.0, 0.0, 11.0, 12.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,

        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 13.0, 14.0, 0.0, 0.0,
        0.0, 0.0, 15.0, 16.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ];
    let expected = Array6::from_shape_vec((2, 2, 6, 6, 1, 1), expected_data).unwrap();
    assert_eq!(cols, expected);
}

#[test]
fn test_im2col_quadrant_bands() {
    // 8x8输入按行成带状（1,2,3,4循环），2x2核步长2：
    // 每个输出patch都是[[v(2oy); 2], [v(2oy+1); 2]]，复现带状结构
    let row_values = [1.0f32, 2.0, 3.0, 4.0, 1.0, 2.0, 3.0, 4.0];
    let input_data: Vec<f32> = row_values
        .iter()
        .flat_map(|&v| std::iter::repeat(v).take(8))
        .collect();
    let input = Array4::from_shape_vec((1, 1, 8, 8), input_data).unwrap();

    let cols = im2col(
        &input.view(),
        (2, 2),
        (2, 2),
        PaddingMode::Explicit { pad_h: 0, pad_w: 0 },
    )
    .unwrap();

    let mut expected_data = Vec::with_capacity(64);
    for oy in 0..4 {
        let top = row_values[2 * oy];
        let bottom = row_values[2 * oy + 1];
        for _ox in 0..4 {
            expected_data.extend_from_slice(&[top, top, bottom, bottom]);
        }
    }
    let expected = Array6::from_shape_vec((1, 1, 4, 4, 2, 2), expected_data).unwrap();
    assert_eq!(cols, expected);
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑黄金用例↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

#[test]
fn test_im2col_same_mode_zero_fills_padding() {
    // in=3, k=2, s=2, SAME：padTop/padLeft取小的一半（0），右/下各补1
    let input = Array4::from_shape_vec((1, 1, 3, 3), linspace_vec(9)).unwrap();
    let cols = im2col(&input.view(), (2, 2), (2, 2), PaddingMode::Same).unwrap();

    #[rustfmt::skip]
    let expected = Array6::from_shape_vec((1, 1, 2, 2, 2, 2), vec![
        1.0, 2.0, 4.0, 5.0,
        3.0, 0.0, 6.0, 0.0,
        7.0, 8.0, 0.0, 0.0,
        9.0, 0.0, 0.0, 0.0,
    ])
    .unwrap();
    assert_eq!(cols, expected);
}

#[test]
fn test_im2col_into_matches_allocating_version() {
    let input = Array4::from_shape_vec((1, 1, 4, 4), linspace_vec(16)).unwrap();
    let kernel = (2, 2);
    let stride = (2, 2);
    let mode = PaddingMode::Explicit { pad_h: 0, pad_w: 0 };

    let allocated = im2col(&input.view(), kernel, stride, mode).unwrap();

    let mut buffer = Array6::<f64>::zeros((1, 1, 2, 2, 2, 2));
    im2col_into(&input.view(), kernel, stride, mode, &mut buffer.view_mut()).unwrap();
    assert_eq!(buffer, allocated);
}

#[test]
fn test_im2col_into_permuted_view() {
    // 调用方把存储组织为[batch, C, kH, kW, outH, outW]，permute后传入：
    // 写入按逻辑坐标进行，底层存储应呈现permute前的布局
    let input = Array4::from_shape_vec((1, 1, 4, 4), linspace_vec(16)).unwrap();
    let kernel = (2, 2);
    let stride = (2, 2);
    let mode = PaddingMode::Explicit { pad_h: 0, pad_w: 0 };

    let expected = im2col(&input.view(), kernel, stride, mode).unwrap();

    let mut storage = Array6::<f64>::zeros((1, 1, 2, 2, 2, 2));
    {
        let mut view = storage.view_mut().permuted_axes([0, 1, 4, 5, 2, 3]);
        im2col_into(&input.view(), kernel, stride, mode, &mut view).unwrap();
    }
    for oy in 0..2 {
        for ox in 0..2 {
            for ky in 0..2 {
                for kx in 0..2 {
                    assert_eq!(
                        storage[[0, 0, ky, kx, oy, ox]],
                        expected[[0, 0, oy, ox, ky, kx]]
                    );
                }
            }
        }
    }
}

#[test]
fn test_im2col_into_rejects_wrong_buffer_shape() {
    let input = Array4::from_shape_vec((1, 1, 4, 4), linspace_vec(16)).unwrap();
    let mut buffer = Array6::<f64>::zeros((1, 1, 2, 2, 3, 3));
    let result = im2col_into(
        &input.view(),
        (2, 2),
        (2, 2),
        PaddingMode::Explicit { pad_h: 0, pad_w: 0 },
        &mut buffer.view_mut(),
    );
    assert_err!(
        result,
        ConvError::ShapeMismatch([1, 1, 2, 2, 2, 2], [1, 1, 2, 2, 3, 3])
    );
}

#[test]
fn test_im2col_rejects_indivisible_stride() {
    // (5 - 4 + 0) % 2 != 0
    let input = Array4::from_shape_vec((1, 1, 5, 5), linspace_vec(25)).unwrap();
    let result = im2col(
        &input.view(),
        (4, 5),
        (2, 1),
        PaddingMode::Explicit { pad_h: 0, pad_w: 0 },
    );
    assert_err!(result, ConvError::InvalidGeometry { .. });
}
