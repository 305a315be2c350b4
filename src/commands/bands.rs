//! # bands 命令实现
//!
//! 读取结构，统计价电子数并估算 NBANDS。
//!
//! ## 依赖关系
//! - 使用 `cli/bands.rs` 定义的参数
//! - 使用 `workflow/submit.rs` 解码结构, `params/` 估算

use crate::cli::bands::BandsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::params::{electron_count, estimate_nbands};
use crate::utils::output;
use crate::workflow::{decode_geometry, GeometryUpload};

/// 执行 bands 命令
pub fn execute(args: BandsArgs, config: &Config) -> Result<()> {
    output::print_header("Band Count Estimate");

    let cluster = config.cluster(&args.cluster)?;
    let upload = GeometryUpload::from_path(&args.structure)?;
    let structure = decode_geometry(Some(&upload))?;

    let nelect = match args.nelect {
        Some(n) => n,
        None => electron_count(&structure, &config.valence)?,
    };
    let nbands = estimate_nbands(nelect, structure.num_sites(), args.ispin, cluster.cores_per_node)?;

    output::print_kv("Structure", &structure.name);
    output::print_kv("Composition", &structure.composition_string());
    output::print_kv("Sites", &structure.num_sites().to_string());
    output::print_kv("Electrons", &format!("{:.1}", nelect));
    output::print_kv("ISPIN", &args.ispin.to_string());
    output::print_kv(
        "Cluster",
        &format!("{} ({} cores/node)", args.cluster, cluster.cores_per_node),
    );
    println!();
    output::print_success(&format!("NBANDS = {}", nbands));

    Ok(())
}
