//! LRN ユニットのハードウェアエミュレーション
//!
//! アクセラレータは正規化係数 `(bias + alpha/n · Σx²)^(-beta)` をべき乗演算ではなく
//! 12 区間の 1 次式テーブルで計算する。この実装はその演算経路を binary32 で bit-exact に再現する。
//!
//! # データフロー
//!
//! ```text
//! input[c-2..=c+2, y, x]（f16 → f32、範囲外はゼロ）
//!          ↓ × 2^-sf_log2
//!          ↓ 二乗
//!          ↓ 総和 → x
//!     segment_address(x) → addr
//!          ↓
//!     (x · 2^(2·sf_log2) − x_sample[addr]) · comb[addr] + coef0[addr]
//!          ↓ × input[c, y, x]
//!      output[c, y, x]
//! ```
//!
//! alpha = 1e-4, beta = 0.75, bias = 1, n = 5 は係数テーブルに織り込まれている。
mod address;
mod config;
mod constants;
mod evaluate;
mod kernel;
mod register;
mod table;
mod window;

pub use address::{segment_address, unbiased_exponent};
pub use config::LrnConfig;
pub use constants::*;
pub use evaluate::{evaluate, scale_factor};
#[cfg(feature = "parallel")]
pub use kernel::lrn_forward_par;
pub use kernel::lrn_forward;
pub use register::LrnRegister;
pub use table::{CoefficientTable, Segment, TABLE_VERSION, TableSpec};
pub use window::{Window, WindowBounds, window_sum};
