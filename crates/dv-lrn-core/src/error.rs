//! Error types for the LRN emulator
//!
//! どのエラーも設定・入力の誤りであり、リトライは意味を持たない。

use crate::tensor::ChwShape;

/// LRN emulator errors
#[derive(thiserror::Error, Debug)]
pub enum LrnError {
    /// Channel count must be positive
    #[error("channel count must be positive")]
    EmptyChannels,

    /// Input and output tensors differ in shape
    #[error("shape mismatch: input {input}, output {output}")]
    ShapeMismatch { input: ChwShape, output: ChwShape },

    /// Buffer length does not match the declared shape
    #[error("buffer length mismatch for shape {shape}: expected {expected}, got {actual}")]
    BufferLength {
        shape: ChwShape,
        expected: usize,
        actual: usize,
    },

    /// Segment address outside the coefficient table
    #[error("segment index {index} out of table range (len {len})")]
    SegmentOutOfRange { index: usize, len: usize },

    /// sf_log2 does not fit the 4-bit register field
    #[error("sf_log2 {0} exceeds the 4-bit register field (max 15)")]
    ScaleFactorOutOfRange(u32),

    /// Coefficient table column with the wrong number of entries
    #[error("coefficient table column `{column}` has {actual} entries, expected {expected}")]
    TableLength {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Coefficient table with non-finite or otherwise unusable values
    #[error("invalid coefficient table: {0}")]
    InvalidTable(String),

    /// Invalid reference LRN parameters
    #[error("invalid LRN parameters: {0}")]
    InvalidParams(String),

    /// File I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for LRN operations
pub type LrnResult<T> = Result<T, LrnError>;
