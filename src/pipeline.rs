//! 整条流水线：扫描 → 提取 → 汇总 → 写工作簿 → 按客户月份生成对账单

use crate::aggregate::{aggregate, group_by};
use crate::extract::{build_corpus, scan_source_files};
use crate::statement::{period_label, render_statement};
use crate::workbook::write_merged_workbook;
use crate::CompanyConfig;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::sync::mpsc;

pub const MERGED_FILE_NAME: &str = "merged_delivery_orders.xlsx";

/// 逐行追加的进度日志，前端按行消费。stdout 回显和通道转发可以同时开
#[derive(Clone)]
pub struct Logger {
    tx: Option<mpsc::Sender<String>>,
    echo: bool,
}

impl Logger {
    pub fn stdout() -> Self {
        Self { tx: None, echo: true }
    }

    pub fn silent() -> Self {
        Self { tx: None, echo: false }
    }

    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx: Some(tx), echo: false }, rx)
    }

    pub fn line(&self, msg: impl Into<String>) {
        let msg = msg.into();
        if self.echo {
            println!("{}", msg);
        }
        if let Some(tx) = &self.tx {
            let _ = tx.send(msg);
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub generated: usize,
    pub skipped: usize,
}

/// 已存在的对账单不重新生成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementAction {
    Generate,
    Skip,
}

pub fn statement_action(dest: &Path) -> StatementAction {
    if dest.exists() {
        StatementAction::Skip
    } else {
        StatementAction::Generate
    }
}

/// 客户名称要当目录名和文件名用，去掉路径分隔符
fn sanitize_component(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

pub fn run(
    source_dir: &Path,
    output_dir: &Path,
    config: &CompanyConfig,
    log: &Logger,
) -> Result<RunStats> {
    let files = scan_source_files(source_dir)?;
    log.line(format!("找到 {} 个Excel文件", files.len()));

    let corpus = build_corpus(&files, log);
    log.line(format!("共提取 {} 条数据记录", corpus.len()));
    if corpus.is_empty() {
        bail!("未提取到任何数据");
    }

    log.line("正在合并相同的货名和规格...");
    let aggs = aggregate(&corpus);

    fs::create_dir_all(output_dir)
        .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;
    let merged_path = output_dir.join(MERGED_FILE_NAME);
    write_merged_workbook(&merged_path, &corpus, &aggs)
        .with_context(|| format!("无法写入汇总工作簿: {}", merged_path.display()))?;
    log.line(format!("汇总数据共 {} 种品类", aggs.summary.len()));
    log.line(format!("已保存: {}", merged_path.display()));

    let groups = group_by(&corpus, |i| (i.customer.clone(), i.year_month()));
    log.line(format!("共有 {} 个客户月份组合", groups.len()));

    let mut stats = RunStats::default();
    for ((customer, year_month), items) in groups {
        if customer.is_empty() {
            log.line(format!("客户名称缺失，跳过 {} 条记录", items.len()));
            continue;
        }
        let Some(year_month) = year_month else {
            log.line(format!("{} 有 {} 条记录缺少日期，无法确定账期，跳过", customer, items.len()));
            continue;
        };

        let safe_customer = sanitize_component(&customer);
        let customer_dir = output_dir.join(&safe_customer);
        fs::create_dir_all(&customer_dir)
            .with_context(|| format!("无法创建客户文件夹: {}", customer_dir.display()))?;
        let dest = customer_dir.join(format!("statement_{}_{}.xlsx", safe_customer, year_month));

        match statement_action(&dest) {
            StatementAction::Skip => {
                log.line(format!("对账单已存在，跳过: {}", dest.display()));
                stats.skipped += 1;
            }
            StatementAction::Generate => {
                render_statement(&items, &customer, &period_label(&year_month), &dest, config)
                    .with_context(|| format!("生成对账单失败: {}", dest.display()))?;
                log.line(format!("对账单已生成: {}", dest.display()));
                stats.generated += 1;
            }
        }
    }

    log.line(format!("新生成: {} 个对账单", stats.generated));
    log.line(format!("已跳过: {} 个对账单", stats.skipped));
    Ok(stats)
}
