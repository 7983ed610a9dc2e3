use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

use delivery_order_merger::{build_corpus, run, scan_source_files, CompanyConfig, Logger};

#[derive(Parser)]
#[command(name = "merge_orders")]
#[command(about = "合并送货单并按客户、月份生成对账单")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 合并送货单，写汇总工作簿并生成对账单
    Run {
        /// 送货单所在目录
        #[arg(short, long, default_value = "raw-data")]
        input: String,
        /// 输出目录
        #[arg(short, long, default_value = "output")]
        output: String,
        /// 公司信息配置文件（JSON，缺省用内置信息）
        #[arg(short, long)]
        config: Option<String>,
    },
    /// 只扫描并提取数据，报告数量，不写任何文件
    Check {
        /// 送货单所在目录
        #[arg(short, long, default_value = "raw-data")]
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { input, output, config } => {
            let config = match config {
                Some(path) => CompanyConfig::load_from_file(path)?,
                None => CompanyConfig::default(),
            };
            let log = Logger::stdout();
            let stats = run(Path::new(input), Path::new(output), &config, &log)?;
            println!(
                "✅ 处理完成：新生成 {} 个对账单，跳过 {} 个，输出目录: {}",
                stats.generated, stats.skipped, output
            );
        }
        Commands::Check { input } => {
            let log = Logger::stdout();
            let files = scan_source_files(Path::new(input))?;
            println!("找到 {} 个Excel文件", files.len());
            let corpus = build_corpus(&files, &log);
            println!("✅ 共提取 {} 条数据记录", corpus.len());
        }
    }

    Ok(())
}
