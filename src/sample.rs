//! 按固定版式写出送货单文件，供演示和测试用

use crate::layout;
use anyhow::Result;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::path::Path;

pub struct SampleRow<'a> {
    pub product_name: &'a str,
    pub spec: &'a str,
    pub quantity: f64,
    pub unit: &'a str,
    pub unit_price: f64,
    pub amount: f64,
}

/// 写一张符合提取版式的送货单：第 7 行客户和日期，第 11 行起是明细，最后一行合计
pub fn write_delivery_order(
    path: &Path,
    customer: &str,
    date: &str,
    rows: &[SampleRow],
) -> Result<()> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();

    let title_format = Format::new()
        .set_font_size(16)
        .set_bold()
        .set_align(FormatAlign::Center);
    ws.merge_range(0, 0, 0, layout::AMOUNT_COL as u16, "送货单", &title_format)?;

    ws.write(layout::HEADER_ROW, layout::CUSTOMER_COL as u16 - 1, "客户：")?;
    ws.write(layout::HEADER_ROW, layout::CUSTOMER_COL as u16, customer)?;
    ws.write(layout::HEADER_ROW, layout::DATE_COL as u16 - 1, "日期：")?;
    ws.write(layout::HEADER_ROW, layout::DATE_COL as u16, date)?;

    // 数据区前一行放列名
    let caption_row = layout::DATA_START_ROW - 1;
    ws.write(caption_row, layout::PRODUCT_COL as u16, "货名")?;
    ws.write(caption_row, layout::SPEC_COL as u16, "规格")?;
    ws.write(caption_row, layout::QUANTITY_COL as u16, "数量")?;
    ws.write(caption_row, layout::UNIT_COL as u16, "单位")?;
    ws.write(caption_row, layout::UNIT_PRICE_COL as u16, "单价")?;
    ws.write(caption_row, layout::AMOUNT_COL as u16, "金额")?;

    let mut total = 0.0;
    for (i, row) in rows.iter().enumerate() {
        let r = layout::DATA_START_ROW + i as u32;
        ws.write(r, layout::PRODUCT_COL as u16, row.product_name)?;
        ws.write(r, layout::SPEC_COL as u16, row.spec)?;
        ws.write(r, layout::QUANTITY_COL as u16, row.quantity)?;
        ws.write(r, layout::UNIT_COL as u16, row.unit)?;
        ws.write(r, layout::UNIT_PRICE_COL as u16, row.unit_price)?;
        ws.write(r, layout::AMOUNT_COL as u16, row.amount)?;
        total += row.amount;
    }

    let total_row = layout::DATA_START_ROW + rows.len() as u32;
    ws.write(total_row, layout::PRODUCT_COL as u16, "合计金额")?;
    ws.write(total_row, layout::AMOUNT_COL as u16, total)?;

    workbook.save(path)?;
    Ok(())
}
