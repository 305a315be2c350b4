//! # 价电子数
//!
//! 推荐 PAW 赝势 (H..Bi) 的默认 ZVAL，用于从结构直接求 NELECT。
//! 配置文件中的 `valence` 表可以逐元素覆盖。
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs` 和 `commands/submit.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{ParbenchError, Result};
use crate::models::Crystal;

use std::collections::BTreeMap;

/// 默认赝势的价电子数
pub fn default_valence(element: &str) -> Option<f64> {
    let zval = match element {
        "H" => 1.0,
        "He" => 2.0,
        "Li" => 3.0,  // Li_sv
        "Be" => 4.0,  // Be_sv
        "B" => 3.0,
        "C" => 4.0,
        "N" => 5.0,
        "O" => 6.0,
        "F" => 7.0,
        "Ne" => 8.0,
        "Na" => 7.0,  // Na_pv
        "Mg" => 8.0,  // Mg_pv
        "Al" => 3.0,
        "Si" => 4.0,
        "P" => 5.0,
        "S" => 6.0,
        "Cl" => 7.0,
        "Ar" => 8.0,
        "K" => 9.0,   // K_sv
        "Ca" => 10.0, // Ca_sv
        "Sc" => 11.0, // Sc_sv
        "Ti" => 10.0, // Ti_pv
        "V" => 11.0,  // V_pv
        "Cr" => 12.0, // Cr_pv
        "Mn" => 13.0, // Mn_pv
        "Fe" => 14.0, // Fe_pv
        "Co" => 9.0,
        "Ni" => 16.0, // Ni_pv
        "Cu" => 17.0, // Cu_pv
        "Zn" => 12.0,
        "Ga" => 13.0, // Ga_d
        "Ge" => 14.0, // Ge_d
        "As" => 5.0,
        "Se" => 6.0,
        "Br" => 7.0,
        "Kr" => 8.0,
        "Rb" => 9.0,  // Rb_sv
        "Sr" => 10.0, // Sr_sv
        "Y" => 11.0,  // Y_sv
        "Zr" => 12.0, // Zr_sv
        "Nb" => 11.0, // Nb_pv
        "Mo" => 12.0, // Mo_pv
        "Tc" => 13.0, // Tc_pv
        "Ru" => 14.0, // Ru_pv
        "Rh" => 15.0, // Rh_pv
        "Pd" => 10.0,
        "Ag" => 11.0,
        "Cd" => 12.0,
        "In" => 13.0, // In_d
        "Sn" => 14.0, // Sn_d
        "Sb" => 5.0,
        "Te" => 6.0,
        "I" => 7.0,
        "Xe" => 8.0,
        "Cs" => 9.0,  // Cs_sv
        "Ba" => 10.0, // Ba_sv
        "La" => 11.0,
        "Hf" => 10.0, // Hf_pv
        "Ta" => 11.0, // Ta_pv
        "W" => 12.0,  // W_pv
        "Re" => 13.0, // Re_pv
        "Os" => 14.0, // Os_pv
        "Ir" => 9.0,
        "Pt" => 10.0,
        "Au" => 11.0,
        "Hg" => 12.0,
        "Tl" => 13.0, // Tl_d
        "Pb" => 14.0, // Pb_d
        "Bi" => 15.0, // Bi_d
        _ => return None,
    };
    Some(zval)
}

/// 结构的总价电子数；`overrides` 优先于默认表
pub fn electron_count(crystal: &Crystal, overrides: &BTreeMap<String, f64>) -> Result<f64> {
    crystal
        .composition()
        .iter()
        .map(|(element, n)| {
            overrides
                .get(element)
                .copied()
                .or_else(|| default_valence(element))
                .map(|zval| zval * *n as f64)
                .ok_or_else(|| ParbenchError::UnknownElement(element.clone()))
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn structure(elements: &[&str]) -> Crystal {
        let atoms = elements
            .iter()
            .map(|el| Atom::new(*el, [0.0, 0.0, 0.0]))
            .collect();
        Crystal::new(
            "test",
            Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, 90.0, 90.0),
            atoms,
        )
    }

    #[test]
    fn test_electron_count_defaults() {
        // SrTiO3: 10 + 10 + 3*6 = 38
        let crystal = structure(&["Sr", "Ti", "O", "O", "O"]);
        let nelect = electron_count(&crystal, &BTreeMap::new()).unwrap();
        assert!((nelect - 38.0).abs() < 1e-12);
    }

    #[test]
    fn test_override_takes_precedence() {
        let crystal = structure(&["Ti", "O", "O"]);
        let overrides = BTreeMap::from([("Ti".to_string(), 4.0)]);
        let nelect = electron_count(&crystal, &overrides).unwrap();
        assert!((nelect - 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_element() {
        let crystal = structure(&["Si", "Xx"]);
        let err = electron_count(&crystal, &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, ParbenchError::UnknownElement(ref el) if el == "Xx"));
    }
}
