//! # 晶体结构数据模型
//!
//! 提交作业时使用的晶体结构表示：晶格 + 原子位点。
//! 负责组分字符串（用于生成作业目录名）以及 k 点网格所需的晶格几何量。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `params/`, `workflow/` 使用
//! - 使用 `models/element.rs`

use super::element::electronegativity;

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格，角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let (cos_alpha, cos_beta) = (alpha.to_radians().cos(), beta.to_radians().cos());
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();

        Lattice {
            matrix: [
                [a, 0.0, 0.0],
                [b * cos_gamma, b * sin_gamma, 0.0],
                [c1, c2, c3],
            ],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 三个晶格向量的长度 (a, b, c)
    pub fn lengths(&self) -> [f64; 3] {
        self.matrix.map(|v| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt())
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a, b, c] = self.lengths();
        let [va, vb, vc] = self.matrix;

        let angle = |u: [f64; 3], v: [f64; 3], lu: f64, lv: f64| {
            let dot: f64 = u.iter().zip(v.iter()).map(|(x, y)| x * y).sum();
            (dot / (lu * lv)).clamp(-1.0, 1.0).acos().to_degrees()
        };

        (
            a,
            b,
            c,
            angle(vb, vc, b, c),
            angle(va, vc, a, c),
            angle(va, vb, a, b),
        )
    }

    /// 晶格体积（带符号的行列式）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 倒易晶格体积，包含 2π 因子
    pub fn reciprocal_volume(&self) -> f64 {
        (2.0 * PI).powi(3) / self.volume().abs()
    }

    /// 是否为六方晶格 (a = b, α = β = 90°, γ = 120°)
    pub fn is_hexagonal(&self) -> bool {
        let (a, b, _, alpha, beta, gamma) = self.parameters();
        let tol = 1e-3;
        (a - b).abs() < tol
            && (alpha - 90.0).abs() < tol
            && (beta - 90.0).abs() < tol
            && (gamma - 120.0).abs() < tol
    }

    /// 笛卡尔坐标转分数坐标；奇异晶格时原样返回
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        let det = self.volume();
        if det.abs() < 1e-10 {
            return cart;
        }

        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        // 行向量约定：cart = frac · M，故 frac = cart · M⁻¹
        [0, 1, 2].map(|j| (0..3).map(|i| cart[i] * inv[i][j]).sum::<f64>())
    }
}

/// 原子位点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 晶体结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,

    /// 来源文件格式
    #[serde(default)]
    pub source_format: Option<String>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
            source_format: None,
        }
    }

    /// 位点数
    pub fn num_sites(&self) -> usize {
        self.atoms.len()
    }

    /// 组分：按 Pauling 电负性升序统计，电负性相同时按元素符号排序，
    /// 未收录电负性的元素排在最后
    pub fn composition(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for atom in &self.atoms {
            match counts.iter_mut().find(|(el, _)| *el == atom.element) {
                Some((_, n)) => *n += 1,
                None => counts.push((atom.element.clone(), 1)),
            }
        }
        counts.sort_by(|(a, _), (b, _)| {
            let xa = electronegativity(a).unwrap_or(f64::INFINITY);
            let xb = electronegativity(b).unwrap_or(f64::INFINITY);
            xa.total_cmp(&xb).then_with(|| a.cmp(b))
        });
        counts
    }

    /// 组分字符串，计数总是显式写出，例如 "Na1 Cl1"
    pub fn composition_string(&self) -> String {
        self.composition()
            .iter()
            .map(|(el, n)| format!("{}{}", el, n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
