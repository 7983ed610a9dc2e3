//! 把总数据集和五张分析视图写进一个多工作表的汇总工作簿

use crate::aggregate::Aggregates;
use crate::LineItem;
use anyhow::Result;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

pub fn write_merged_workbook(path: &Path, corpus: &[LineItem], aggs: &Aggregates) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    // 汇总
    let ws = workbook.add_worksheet();
    ws.set_name("汇总")?;
    write_header(
        ws,
        &["货名", "规格", "单位", "数量", "平均单价", "金额", "客户", "文件"],
        &header,
    )?;
    for (i, s) in aggs.summary.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write(row, 0, s.product_name.as_str())?;
        ws.write(row, 1, s.spec.as_str())?;
        ws.write(row, 2, s.unit.as_str())?;
        ws.write(row, 3, s.quantity)?;
        write_opt(ws, row, 4, s.avg_price)?;
        ws.write(row, 5, s.amount)?;
        ws.write(row, 6, s.customers.as_str())?;
        ws.write(row, 7, s.files.as_str())?;
    }

    // 详细数据，按货名、规格、日期排序
    let mut detail: Vec<&LineItem> = corpus.iter().collect();
    detail.sort_by(|a, b| {
        (&a.product_name, &a.spec, a.date).cmp(&(&b.product_name, &b.spec, b.date))
    });
    let ws = workbook.add_worksheet();
    ws.set_name("详细数据")?;
    write_header(
        ws,
        &["货名", "规格", "数量", "单位", "单价", "金额", "客户", "日期", "文件", "月份"],
        &header,
    )?;
    for (i, item) in detail.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write(row, 0, item.product_name.as_str())?;
        ws.write(row, 1, item.spec.as_str())?;
        ws.write(row, 2, item.quantity)?;
        ws.write(row, 3, item.unit.as_str())?;
        ws.write(row, 4, item.unit_price)?;
        ws.write(row, 5, item.amount)?;
        ws.write(row, 6, item.customer.as_str())?;
        ws.write(row, 7, item.date_display().as_str())?;
        ws.write(row, 8, item.source_file.as_str())?;
        ws.write(row, 9, item.year_month().unwrap_or_default().as_str())?;
    }

    // 按客户分析
    let ws = workbook.add_worksheet();
    ws.set_name("按客户分析")?;
    write_header(ws, &["客户", "订单数", "数量", "金额", "平均单价"], &header)?;
    for (i, s) in aggs.by_customer.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write(row, 0, s.customer.as_str())?;
        ws.write(row, 1, s.orders as u32)?;
        ws.write(row, 2, s.quantity)?;
        ws.write(row, 3, s.amount)?;
        write_opt(ws, row, 4, s.avg_price)?;
    }

    // 按产品分析
    let ws = workbook.add_worksheet();
    ws.set_name("按产品分析")?;
    write_header(
        ws,
        &["货名", "规格", "单位", "数量", "平均单价", "金额", "客户"],
        &header,
    )?;
    for (i, s) in aggs.by_product.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write(row, 0, s.product_name.as_str())?;
        ws.write(row, 1, s.spec.as_str())?;
        ws.write(row, 2, s.unit.as_str())?;
        ws.write(row, 3, s.quantity)?;
        write_opt(ws, row, 4, s.avg_price)?;
        ws.write(row, 5, s.amount)?;
        ws.write(row, 6, s.customers.as_str())?;
    }

    // 按月份分析
    let ws = workbook.add_worksheet();
    ws.set_name("按月份分析")?;
    write_header(
        ws,
        &["月份", "订单数", "客户数", "数量", "金额", "平均订单金额"],
        &header,
    )?;
    for (i, s) in aggs.by_month.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write(row, 0, s.month.as_str())?;
        ws.write(row, 1, s.orders as u32)?;
        ws.write(row, 2, s.customers as u32)?;
        ws.write(row, 3, s.quantity)?;
        ws.write(row, 4, s.amount)?;
        ws.write(row, 5, s.avg_order_amount)?;
    }

    // 客户月度分析
    let ws = workbook.add_worksheet();
    ws.set_name("客户月度分析")?;
    write_header(ws, &["客户", "月份", "订单数", "数量", "金额"], &header)?;
    for (i, s) in aggs.by_customer_month.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write(row, 0, s.customer.as_str())?;
        ws.write(row, 1, s.month.as_str())?;
        ws.write(row, 2, s.orders as u32)?;
        ws.write(row, 3, s.quantity)?;
        ws.write(row, 4, s.amount)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_header(ws: &mut Worksheet, titles: &[&str], format: &Format) -> Result<()> {
    for (col, title) in titles.iter().enumerate() {
        ws.write_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}

/// 数量为零的分组没有平均单价，留空
fn write_opt(ws: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<()> {
    if let Some(v) = value {
        ws.write(row, col, v)?;
    }
    Ok(())
}
