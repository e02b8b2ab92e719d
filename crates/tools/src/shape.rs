//! `WxHxC` 形式の形状指定

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dv_lrn_core::fixture::FixtureSpec;

/// コマンドライン上の形状（幅 x 高さ x チャンネル数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeArg(pub FixtureSpec);

impl FromStr for ShapeArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(['x', 'X']).collect();
        if parts.len() != 3 {
            bail!("shape must be WxHxC, got {s:?}");
        }
        let mut dims = [0usize; 3];
        for (dim, part) in dims.iter_mut().zip(&parts) {
            *dim = part
                .parse()
                .with_context(|| format!("invalid dimension {part:?} in shape {s:?}"))?;
        }
        let [width, height, channels] = dims;
        if channels == 0 {
            bail!("channel count must be positive: {s:?}");
        }
        Ok(Self(FixtureSpec::new(width, height, channels)))
    }
}

/// 10 進または `0x` 付き 16 進の u16
pub fn parse_u16(s: &str) -> Result<u16> {
    let s = s.trim();
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    value.with_context(|| format!("invalid 16-bit value {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_width_height_channels() {
        let ShapeArg(spec) = "56x56x64".parse().unwrap();
        assert_eq!(spec, FixtureSpec::new(56, 56, 64));
        let ShapeArg(spec) = "2X3x4".parse().unwrap();
        assert_eq!(spec, FixtureSpec::new(2, 3, 4));
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert!("56x56".parse::<ShapeArg>().is_err());
        assert!("axbxc".parse::<ShapeArg>().is_err());
        assert!("1x1x0".parse::<ShapeArg>().is_err());
    }

    #[test]
    fn parses_register_words() {
        assert_eq!(parse_u16("0x0503").unwrap(), 0x0503);
        assert_eq!(parse_u16("1283").unwrap(), 1283);
        assert!(parse_u16("0x10000").is_err());
    }
}
