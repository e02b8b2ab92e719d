//! LRN ユニット定数定義
//!
//! ハードウェアに焼き込まれたパラメータと IEEE-754 binary32 のビット配置。

// =============================================================================
// LRN パラメータ（ハードウェア固定）
// =============================================================================

/// ローカルウィンドウ幅（チャンネル方向）
pub const LOCAL_SIZE: usize = 5;

/// ウィンドウ中心から片側の幅（`(LOCAL_SIZE - 1) / 2`）
pub const HALF_WINDOW: usize = (LOCAL_SIZE - 1) / 2;

/// alpha（係数テーブルに織り込み済み）
pub const ALPHA: f64 = 1e-4;

/// beta（係数テーブルに織り込み済み）
pub const BETA: f64 = 0.75;

/// bias / k（係数テーブルに織り込み済み）
pub const BIAS: f64 = 1.0;

// =============================================================================
// セグメントテーブル
// =============================================================================

/// 区分多項式のセグメント数
pub const NUM_SEGMENTS: usize = 12;

/// 1 セグメントあたりの指数幅の log2
///
/// 指数 2 つ（x が 4 倍になる範囲）で 1 セグメントを共有する。
pub const ADDR_STEP_LOG: u32 = 1;

/// x² スケールファクタ（log2）の既定値
pub const DEFAULT_SF_LOG2: u32 = 5;

/// sf_log2 の最大値（コマンドワードの 4bit フィールド）
pub const SF_LOG2_MAX: u32 = 15;

// =============================================================================
// IEEE-754 binary32
// =============================================================================
//
// ```text
//  31 | 30 ........ 23 | 22 ..................... 0
//  S  |  exponent (8)  |       mantissa (23)
// ```

/// 指数フィールドの開始ビット
pub const F32_EXP_SHIFT: u32 = 23;

/// 指数フィールドのマスク（シフト後）
pub const F32_EXP_MASK: u32 = 0xff;

/// 指数バイアス
pub const F32_EXP_BIAS: i32 = 127;
