//! LRN forward
//!
//! 全 `(c, y, x)` について `evaluate(window_sum(c, y, x), input[c, y, x])` を計算する。
//! 各出力要素は自身のウィンドウだけに依存するので、計算順序は結果に影響しない。
//!
//! 書き込みの前に全要素のセグメントアドレスを検証する。
//! エラー時に `output` は一切変更されない。

use super::address::segment_address;
use super::config::LrnConfig;
use super::evaluate::evaluate;
use super::window::window_sum;
use crate::element::Element;
use crate::error::{LrnError, LrnResult};
use crate::tensor::Tensor3;

/// 計算前の形状検証
fn check_shapes<T: Element, U: Element>(input: &Tensor3<T>, output: &Tensor3<U>) -> LrnResult<()> {
    input.shape().validate()?;
    if input.shape() != output.shape() {
        return Err(LrnError::ShapeMismatch {
            input: input.shape(),
            output: output.shape(),
        });
    }
    Ok(())
}

/// チャンネル `c` の全要素がテーブル内のセグメントに収まるか検証（読み取りのみ）
fn check_plane_segments<T: Element>(
    input: &Tensor3<T>,
    c: usize,
    config: &LrnConfig,
) -> LrnResult<()> {
    let shape = input.shape();
    for y in 0..shape.height {
        for x in 0..shape.width {
            let sum = window_sum(input, c, y, x, config);
            config.table().segment(segment_address(sum, config.sf_log2()))?;
        }
    }
    Ok(())
}

/// チャンネル `c` の出力平面を計算
fn forward_plane<T: Element, U: Element>(
    input: &Tensor3<T>,
    c: usize,
    plane: &mut [U],
    config: &LrnConfig,
) -> LrnResult<()> {
    let width = input.shape().width;
    let values = input.plane(c);
    for (i, (out, v)) in plane.iter_mut().zip(values).enumerate() {
        let (y, x) = (i / width, i % width);
        let sum = window_sum(input, c, y, x, config);
        *out = U::from_f32(evaluate(sum, v.to_f32(), config)?);
    }
    Ok(())
}

/// LRN forward（逐次）
///
/// `output` は `input` と同じ形状でなければならない。
/// 形状不正・テーブル外の入力では何も書き込まずにエラーを返す。
pub fn lrn_forward<T: Element, U: Element>(
    input: &Tensor3<T>,
    output: &mut Tensor3<U>,
    config: &LrnConfig,
) -> LrnResult<()> {
    check_shapes(input, output)?;
    let shape = input.shape();
    log::debug!("lrn_forward: shape={shape}, sf_log2={}", config.sf_log2());

    let plane_len = shape.plane_len();
    if plane_len == 0 {
        return Ok(());
    }
    for c in 0..shape.channels {
        check_plane_segments(input, c, config)?;
    }
    for (c, plane) in output.as_mut_slice().chunks_mut(plane_len).enumerate() {
        forward_plane(input, c, plane, config)?;
    }
    Ok(())
}

/// LRN forward（チャンネル平面単位で rayon 並列）
///
/// 結果は [`lrn_forward`] とビット単位で一致する。
#[cfg(feature = "parallel")]
pub fn lrn_forward_par<T: Element, U: Element>(
    input: &Tensor3<T>,
    output: &mut Tensor3<U>,
    config: &LrnConfig,
) -> LrnResult<()> {
    use rayon::prelude::*;

    check_shapes(input, output)?;
    let shape = input.shape();
    log::debug!("lrn_forward_par: shape={shape}, sf_log2={}", config.sf_log2());

    let plane_len = shape.plane_len();
    if plane_len == 0 {
        return Ok(());
    }
    (0..shape.channels)
        .into_par_iter()
        .try_for_each(|c| check_plane_segments(input, c, config))?;
    output
        .as_mut_slice()
        .par_chunks_mut(plane_len)
        .enumerate()
        .try_for_each(|(c, plane)| forward_plane(input, c, plane, config))
}
