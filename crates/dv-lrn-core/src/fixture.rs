//! テスト fixture（入出力ファイルと乱数入力）
//!
//! # ファイル配置
//!
//! ```text
//! {dir}/{width}x{height}/{channels}.i.bin   入力
//! {dir}/{width}x{height}/{channels}.o.bin   期待出力
//! ```
//!
//! 中身は CHW 順の binary16（リトルエンディアン）をヘッダ無しで並べたもの。

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use half::f16;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{LrnError, LrnResult};
use crate::tensor::{ChwShape, Tensor3};

/// 既定の乱数シード
pub const DEFAULT_SEED: u64 = 12345;

/// 一様分布プールの要素数
pub const UNIFORM_POOL_SIZE: usize = 1001;

/// 既定で生成する形状（幅, 高さ, チャンネル数）
pub const CANONICAL_SHAPES: [(usize, usize, usize); 7] = [
    (56, 56, 64),
    (1, 1, 32),
    (2, 2, 16),
    (2, 2, 64),
    (4, 4, 64),
    (64, 64, 64),
    (53, 53, 64),
];

/// 入力値の取り出し元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValuePool {
    /// {-2, -1, 0, 1, 2}
    #[default]
    Discrete,
    /// U(-1, 1) から引いた 1001 値
    Uniform,
}

impl ValuePool {
    fn values(self, rng: &mut Xoshiro256PlusPlus) -> Vec<f32> {
        match self {
            Self::Discrete => vec![-2.0, -1.0, 0.0, 1.0, 2.0],
            Self::Uniform => (0..UNIFORM_POOL_SIZE)
                .map(|_| rng.random_range(-1.0f32..1.0))
                .collect(),
        }
    }
}

/// fixture の識別（幅, 高さ, チャンネル数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixtureSpec {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl FixtureSpec {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    pub fn canonical() -> Vec<Self> {
        CANONICAL_SHAPES
            .iter()
            .map(|&(w, h, c)| Self::new(w, h, c))
            .collect()
    }

    pub fn shape(&self) -> LrnResult<ChwShape> {
        ChwShape::new(self.channels, self.height, self.width)
    }

    /// `{dir}/{w}x{h}`
    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(format!("{}x{}", self.width, self.height))
    }

    pub fn input_path(&self, root: &Path) -> PathBuf {
        self.dir(root).join(format!("{}.i.bin", self.channels))
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        self.dir(root).join(format!("{}.o.bin", self.channels))
    }
}

/// 乱数入力を生成する（同じシードなら同じ結果）
pub fn generate_input(shape: ChwShape, pool: ValuePool, seed: u64) -> LrnResult<Tensor3<f16>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let values = pool.values(&mut rng);
    let data = (0..shape.len())
        .map(|_| {
            let v = values.choose(&mut rng).copied().unwrap_or(0.0);
            f16::from_f32(v)
        })
        .collect();
    Tensor3::from_vec(shape, data)
}

/// binary16 ファイルを読み込む（バイト長を形状と照合する）
pub fn read_half_file<P: AsRef<Path>>(path: P, shape: ChwShape) -> LrnResult<Tensor3<f16>> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;

    let expected = shape.len() * 2;
    if bytes.len() != expected {
        return Err(LrnError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{}: expected {expected} bytes for shape {shape}, got {}",
                path.display(),
                bytes.len()
            ),
        )));
    }
    let data = bytes
        .chunks_exact(2)
        .map(|b| f16::from_le_bytes([b[0], b[1]]))
        .collect();
    Tensor3::from_vec(shape, data)
}

/// binary16 ファイルを読み込む（形状を持たない生バッファ）
pub fn read_half_values<P: AsRef<Path>>(path: P) -> LrnResult<Vec<f16>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    if bytes.len() % 2 != 0 {
        return Err(LrnError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: odd byte length {}", path.display(), bytes.len()),
        )));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|b| f16::from_le_bytes([b[0], b[1]]))
        .collect())
}

/// binary16 ファイルを書き出す（親ディレクトリは作成する）
pub fn write_half_file<P: AsRef<Path>>(path: P, values: &[f16]) -> LrnResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for v in values {
        writer.write_all(&v.to_le_bytes())?;
    }
    writer.flush()?;
    log::debug!("wrote {} values to {}", values.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let spec = FixtureSpec::new(56, 56, 64);
        let root = Path::new("data");
        assert_eq!(spec.input_path(root), Path::new("data/56x56/64.i.bin"));
        assert_eq!(spec.output_path(root), Path::new("data/56x56/64.o.bin"));
        assert_eq!(spec.dir(root), Path::new("data/56x56"));
    }

    #[test]
    fn test_canonical_shapes() {
        let specs = FixtureSpec::canonical();
        assert_eq!(specs.len(), 7);
        assert_eq!(specs[1], FixtureSpec::new(1, 1, 32));
        // shape は CHW 順
        let shape = specs[0].shape().unwrap();
        assert_eq!((shape.channels, shape.height, shape.width), (64, 56, 56));
    }

    #[test]
    fn test_generate_is_seeded() {
        let shape = ChwShape::new(16, 4, 4).unwrap();
        let a = generate_input(shape, ValuePool::Discrete, DEFAULT_SEED).unwrap();
        let b = generate_input(shape, ValuePool::Discrete, DEFAULT_SEED).unwrap();
        let c = generate_input(shape, ValuePool::Discrete, DEFAULT_SEED + 1).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_discrete_pool_values() {
        let shape = ChwShape::new(8, 8, 8).unwrap();
        let t = generate_input(shape, ValuePool::Discrete, 7).unwrap();
        for v in t.as_slice() {
            let v = v.to_f32();
            assert!([-2.0, -1.0, 0.0, 1.0, 2.0].contains(&v), "{v}");
        }
    }

    #[test]
    fn test_uniform_pool_range() {
        let shape = ChwShape::new(8, 8, 8).unwrap();
        let t = generate_input(shape, ValuePool::Uniform, 7).unwrap();
        assert!(t.as_slice().iter().all(|v| (-1.0..=1.0).contains(&v.to_f32())));
    }

    #[test]
    fn test_file_round_trip() {
        let tmp = TempDir::new().unwrap();
        let spec = FixtureSpec::new(2, 3, 4);
        let shape = spec.shape().unwrap();
        let t = generate_input(shape, ValuePool::Uniform, 1).unwrap();
        let path = spec.input_path(tmp.path());
        write_half_file(&path, t.as_slice()).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 48);
        let back = read_half_file(&path, shape).unwrap();
        assert_eq!(back, t);
        assert_eq!(read_half_values(&path).unwrap().len(), 24);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("short.bin");
        fs::write(&path, [0u8; 6]).unwrap();
        let shape = ChwShape::new(2, 2, 1).unwrap();
        let err = read_half_file(&path, shape).unwrap_err();
        assert!(err.to_string().contains("expected 8 bytes"), "{err}");
    }
}
