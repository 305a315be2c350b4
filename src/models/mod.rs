//! # 数据模型模块
//!
//! 定义晶体结构和并行计时记录的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `analysis/`, `workflow/` 和 `commands/` 使用
//! - 子模块: element, structure, timing

pub mod element;
pub mod structure;
pub mod timing;

pub use structure::{Atom, Crystal, Lattice};
pub use timing::{Axis, TimingRecord, TimingSet};
