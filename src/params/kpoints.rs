//! # k 点网格
//!
//! 由倒易空间密度（每 Å⁻³ 的 k 点数）生成自动网格。
//!
//! ```text
//! kppa = density * V_recip * nsites
//! mult = (kppa / nsites * a * b * c)^(1/3)
//! div_i = floor(max(mult / |a_i|, 1))
//! ```
//!
//! 六方晶格使用 Gamma 中心网格，其余使用 Monkhorst-Pack。
//!
//! ## 依赖关系
//! - 被 `workflow/` 使用
//! - 使用 `models/structure.rs`

use crate::models::Crystal;

use serde::{Deserialize, Serialize};

/// 自动 k 点网格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpointGrid {
    pub divisions: [u32; 3],
    pub gamma_centered: bool,
}

impl KpointGrid {
    /// 按倒易体积密度生成网格
    pub fn from_reciprocal_density(crystal: &Crystal, density: u32) -> Self {
        let lattice = &crystal.lattice;
        let nsites = crystal.num_sites().max(1) as f64;

        let kppa = density as f64 * lattice.reciprocal_volume() * nsites;
        let lengths = lattice.lengths();
        let ngrid = kppa / nsites;
        let mult = (ngrid * lengths[0] * lengths[1] * lengths[2]).cbrt();

        KpointGrid {
            divisions: lengths.map(|l| (mult / l).max(1.0).floor() as u32),
            gamma_centered: lattice.is_hexagonal(),
        }
    }

    /// KPOINTS 文件内容
    pub fn to_kpoints_string(&self, density: u32) -> String {
        let [a, b, c] = self.divisions;
        format!(
            "Automatic kpoint scheme, reciprocal density {}\n0\n{}\n{} {} {}\n",
            density,
            if self.gamma_centered {
                "Gamma"
            } else {
                "Monkhorst"
            },
            a,
            b,
            c
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn cubic(a: f64) -> Crystal {
        Crystal::new(
            "cubic",
            Lattice::from_parameters(a, a, a, 90.0, 90.0, 90.0),
            vec![Atom::new("Si", [0.0, 0.0, 0.0])],
        )
    }

    #[test]
    fn test_cubic_grid() {
        // a = 5: V_recip = (2π)^3/125 ≈ 1.984; ngrid ≈ 595.3 @ 300
        // mult = (595.3 * 125)^(1/3) ≈ 42.07 -> 42.07 / 5 -> 8
        let grid = KpointGrid::from_reciprocal_density(&cubic(5.0), 300);
        assert_eq!(grid.divisions, [8, 8, 8]);
        assert!(!grid.gamma_centered);
    }

    #[test]
    fn test_small_density_clamps_to_one() {
        let grid = KpointGrid::from_reciprocal_density(&cubic(50.0), 1);
        assert_eq!(grid.divisions, [1, 1, 1]);
    }

    #[test]
    fn test_hexagonal_is_gamma() {
        let crystal = Crystal::new(
            "hex",
            Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0),
            vec![Atom::new("Mg", [0.0, 0.0, 0.0])],
        );
        let grid = KpointGrid::from_reciprocal_density(&crystal, 100);
        assert!(grid.gamma_centered);
        assert!(grid.to_kpoints_string(100).contains("\nGamma\n"));
    }
}
