//! # NBANDS 估算
//!
//! 根据电子数、离子数和自旋设置给出推荐的能带数，
//! 并向上补齐到每节点核数的整数倍，使能带可以在核之间均分。
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs` 和 `commands/submit.rs` 使用
//! - 无外部模块依赖

use crate::error::{ParbenchError, Result};

/// 自旋设置 (VASP ISPIN)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinMode {
    /// ISPIN = 1
    NonPolarized,
    /// ISPIN = 2
    Polarized,
}

impl TryFrom<u8> for SpinMode {
    type Error = ParbenchError;

    fn try_from(ispin: u8) -> Result<Self> {
        match ispin {
            1 => Ok(SpinMode::NonPolarized),
            2 => Ok(SpinMode::Polarized),
            other => Err(ParbenchError::InvalidConfiguration(format!(
                "ISPIN must be 1 or 2, got {}",
                other
            ))),
        }
    }
}

/// NBANDS 上限
pub const MAX_NBANDS: u32 = 10_000;

/// 估算 NBANDS
///
/// - ISPIN = 1: `round(nelect/2 + nions/2)`
/// - ISPIN = 2: `round(nelect*3/5 + nions)`
///
/// 结果向上取整到 `cores_per_node` 的倍数。半数按"四舍六入五成双"处理。
/// 结果须落在 `1..=MAX_NBANDS` 内，否则报错。
pub fn estimate_nbands(nelect: f64, nions: usize, ispin: u8, cores_per_node: u32) -> Result<u32> {
    let spin = SpinMode::try_from(ispin)?;

    if cores_per_node == 0 {
        return Err(ParbenchError::InvalidConfiguration(
            "cores per node must be positive".to_string(),
        ));
    }
    if !nelect.is_finite() || nelect < 0.0 {
        return Err(ParbenchError::InvalidConfiguration(format!(
            "invalid electron count {}",
            nelect
        )));
    }

    let nions = nions as f64;
    let raw = match spin {
        SpinMode::NonPolarized => nelect / 2.0 + nions / 2.0,
        SpinMode::Polarized => nelect * 3.0 / 5.0 + nions,
    };
    let out_of_range = || {
        ParbenchError::InvalidConfiguration(format!(
            "estimated NBANDS ({:.0}) is outside 1..={}",
            raw, MAX_NBANDS
        ))
    };

    let rounded = raw.round_ties_even();
    if rounded < 1.0 || rounded > f64::from(MAX_NBANDS) {
        return Err(out_of_range());
    }
    let bands = rounded as u32;

    bands
        .div_ceil(cores_per_node)
        .checked_mul(cores_per_node)
        .filter(|&padded| padded <= MAX_NBANDS)
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_polarized_already_multiple() {
        // round(20/2 + 4/2) = 12, 12 是 4 的倍数
        assert_eq!(estimate_nbands(20.0, 4, 1, 4).unwrap(), 12);
    }

    #[test]
    fn test_non_polarized_padded() {
        // round(48/2 + 8/2) = 28 -> 40 (20 核/节点)
        assert_eq!(estimate_nbands(48.0, 8, 1, 20).unwrap(), 40);
        assert_eq!(estimate_nbands(48.0, 8, 1, 28).unwrap(), 28);
    }

    #[test]
    fn test_polarized() {
        // round(50*3/5 + 10) = 40 -> 56 (28 核/节点)
        assert_eq!(estimate_nbands(50.0, 10, 2, 28).unwrap(), 56);
    }

    #[test]
    fn test_half_rounds_to_even() {
        // 9/2 + 0/2 = 4.5 -> 4；11/2 = 5.5 -> 6
        assert_eq!(estimate_nbands(9.0, 0, 1, 1).unwrap(), 4);
        assert_eq!(estimate_nbands(11.0, 0, 1, 1).unwrap(), 6);
    }

    #[test]
    fn test_invalid_spin_mode() {
        for ispin in [0u8, 3, 255] {
            let err = estimate_nbands(20.0, 4, ispin, 4).unwrap_err();
            assert!(matches!(err, ParbenchError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_huge_electron_count_rejected() {
        let err = estimate_nbands(1e10, 4, 1, 28).unwrap_err();
        assert!(matches!(err, ParbenchError::InvalidConfiguration(_)));
        assert!(estimate_nbands(1e10, 4, 2, 28).is_err());
    }

    #[test]
    fn test_bands_must_stay_in_range() {
        // round(0/2 + 1/2) = 0
        assert!(estimate_nbands(0.0, 1, 1, 4).is_err());
        // 19998/2 + 2/2 = 10000，补齐到 28 的倍数后超过上限
        assert_eq!(estimate_nbands(19998.0, 2, 1, 20).unwrap(), 10_000);
        assert!(estimate_nbands(19998.0, 2, 1, 28).is_err());
    }

    #[test]
    fn test_zero_cores_rejected() {
        assert!(estimate_nbands(20.0, 4, 1, 0).is_err());
    }
}
