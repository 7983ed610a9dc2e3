use anyhow::Result;
use clap::Parser;

use delivery_order_merger::sample::{write_delivery_order, SampleRow};

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "生成演示用的送货单文件")]
struct Cli {
    /// 示例文件的输出目录
    #[arg(short, long, default_value = "raw-data")]
    output: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.output)?;

    let dir = std::path::Path::new(&cli.output);
    write_delivery_order(
        &dir.join("送货单_甲公司_20240105.xlsx"),
        "甲公司",
        "2024-01-05",
        &[
            SampleRow {
                product_name: "PVC胶粒",
                spec: "白色",
                quantity: 500.0,
                unit: "公斤",
                unit_price: 8.5,
                amount: 4250.0,
            },
            SampleRow {
                product_name: "色母",
                spec: "黑色",
                quantity: 25.0,
                unit: "包",
                unit_price: 120.0,
                amount: 3000.0,
            },
        ],
    )?;

    write_delivery_order(
        &dir.join("送货单_乙公司_20240210.xlsx"),
        "乙公司",
        "2024-02-10",
        &[SampleRow {
            product_name: "PVC胶粒",
            spec: "透明",
            quantity: 200.0,
            unit: "公斤",
            unit_price: 9.0,
            amount: 1800.0,
        }],
    )?;

    println!("✅ 示例送货单已生成: {}", cli.output);
    Ok(())
}
