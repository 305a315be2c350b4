//! # submit 命令实现
//!
//! 为每个节点数构造一个并行测试工作流并加入队列。
//!
//! ## 流程
//! 1. 解码几何文件（缺失 / 非 UTF-8 / 格式错误时报告并退出）
//! 2. 解析节点列表；无法解析时报告 "Incorrect node list input"，不提交任何内容
//! 3. NBANDS 缺省时由结构估算，估算值须在 1..=10000 内
//! 4. 逐个节点数入队，任一失败则中止剩余的提交
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `workflow/`, `params/`, `utils/progress.rs`, `utils/output.rs`

use crate::cli::submit::{QueueKind, SubmitArgs};
use crate::config::Config;
use crate::error::{ParbenchError, Result};
use crate::params::{electron_count, estimate_nbands, parse_range};
use crate::utils::{output, progress};
use crate::workflow::{
    decode_geometry, submit_workflows, DirectoryQueue, GeometryUpload, JobQueue, Selection,
    SlurmQueue,
};

/// 执行 submit 命令
pub fn execute(args: SubmitArgs, config: &Config) -> Result<()> {
    output::print_header("Parallelization Workflow Submission");

    let cluster = config.cluster(&args.cluster)?;

    let upload = match args.structure {
        Some(ref path) => Some(GeometryUpload::from_path(path)?),
        None => None,
    };
    let structure = decode_geometry(upload.as_ref())?;

    let kpar_range = match args.kpar {
        Some(ref expr) => Some(parse_range(expr)?),
        None => None,
    };

    let nbands = match args.nbands {
        Some(n) => n,
        None => {
            let nelect = electron_count(&structure, &config.valence)?;
            let n = estimate_nbands(nelect, structure.num_sites(), args.ispin, cluster.cores_per_node)?;
            output::print_info(&format!("Estimated NBANDS = {} ({:.1} electrons)", n, nelect));
            n
        }
    };

    let selection = Selection::new(
        &args.cluster,
        cluster,
        args.functional,
        args.kpoints,
        nbands,
        args.ispin,
        &args.nodes,
        kpar_range,
        config.handlers.clone(),
    );

    let Some(ref nodes_list) = selection.nodes_list else {
        return Err(ParbenchError::InvalidNodeList(args.nodes.clone()));
    };

    let mut queue: Box<dyn JobQueue> = match args.queue {
        QueueKind::Directory => {
            let dir = args.queue_dir.clone().unwrap_or_else(|| cluster.queue_dir());
            Box::new(DirectoryQueue::new(dir))
        }
        QueueKind::Slurm => Box::new(SlurmQueue::new(cluster.slurm.clone(), args.sbatch)),
    };

    output::print_kv("Structure", &structure.composition_string());
    output::print_kv(
        "Cluster",
        &format!("{} ({} cores/node)", selection.cluster, selection.cores_per_node),
    );
    output::print_kv("Functional", &args.functional.to_string());
    output::print_kv("K-point density", &args.kpoints.to_string());
    output::print_kv("NBANDS", &nbands.to_string());
    output::print_kv(
        "Nodes",
        &nodes_list
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    output::print_kv("Queue", &queue.name());
    println!();

    let pb = progress::create_progress_bar(nodes_list.len() as u64, "Submitting");
    let result = submit_workflows(queue.as_mut(), &selection, &structure, |nodes, id| {
        pb.println(format!("    {} nodes -> {}", nodes, id));
        pb.inc(1);
    });
    pb.finish_and_clear();
    let report = result?;

    output::print_kv("Directory", &report.directory.display().to_string());
    output::print_done(&format!(
        "Submitted {} workflow(s) to {}",
        report.submitted.len(),
        queue.name()
    ));

    Ok(())
}
