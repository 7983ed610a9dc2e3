//! 合并送货单的出货品类及数量，并按客户、月份生成对账单

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub mod aggregate;
pub mod extract;
pub mod layout;
pub mod pipeline;
pub mod rmb;
pub mod sample;
pub mod statement;
pub mod workbook;

pub use aggregate::{aggregate, Aggregates};
pub use extract::{build_corpus, extract_file, scan_source_files};
pub use pipeline::{run, statement_action, Logger, RunStats, StatementAction};
pub use rmb::rmb_upper;

/// 从送货单提取出来的一条明细记录
#[derive(Debug, Clone)]
pub struct LineItem {
    pub product_name: String,
    pub spec: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    /// 金额直接取自原始单据，不重新计算
    pub amount: f64,
    pub customer: String,
    pub date: Option<NaiveDate>,
    pub source_file: String,
}

impl LineItem {
    /// 年月键，如 "2024-01"；日期缺失或无法解析时为 None
    pub fn year_month(&self) -> Option<String> {
        self.date.map(|d| format!("{:04}-{:02}", d.year(), d.month()))
    }

    /// 对账单和详细数据里显示的日期
    pub fn date_display(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// 对账单表头的公司信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub fax: String,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            company_name: "百惠行对账单".to_string(),
            address: "东莞市黄江镇华南塑胶城区132号".to_string(),
            phone: "(0769) 83631717".to_string(),
            fax: "83637787".to_string(),
        }
    }
}

impl CompanyConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("配置文件格式错误: {}", path))?;
        Ok(config)
    }
}
