//! 单个客户单个月份的对账单排版

use crate::rmb::rmb_upper;
use crate::{CompanyConfig, LineItem};
use anyhow::Result;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;

const COLUMN_WIDTHS: [f64; 7] = [12.0, 20.0, 8.0, 10.0, 10.0, 12.0, 12.0];
const TABLE_HEADERS: [&str; 7] = ["送货日期", "品名规格", "单位", "数量", "单价", "金额", "备注"];

/// 生成一份对账单文件。是否已存在由调用方决定，这里总是写文件
pub fn render_statement(
    items: &[&LineItem],
    customer_name: &str,
    period_label: &str,
    dest: &Path,
    config: &CompanyConfig,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name("对账单")?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        ws.set_column_width(col as u16, *width)?;
    }

    let title_format = Format::new()
        .set_font_size(18)
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let subtitle_format = Format::new()
        .set_font_size(10)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let header_format = Format::new()
        .set_font_size(11)
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_background_color(Color::RGB(0xD3D3D3))
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_font_size(10)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let wrap_format = Format::new()
        .set_font_size(10)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin);

    // 表头区：公司名、地址、联系方式、客户与账期
    ws.merge_range(0, 0, 0, 6, &config.company_name, &title_format)?;
    ws.set_row_height(0, 30)?;
    ws.merge_range(1, 0, 1, 6, &format!("地址：{}", config.address), &subtitle_format)?;
    ws.merge_range(
        2,
        0,
        2,
        6,
        &format!("电话：{}    传真：{}", config.phone, config.fax),
        &subtitle_format,
    )?;
    ws.merge_range(3, 0, 3, 1, &format!("客户：{}", customer_name), &Format::new())?;
    ws.merge_range(
        3,
        2,
        3,
        4,
        &format!("{}对账单", period_label),
        &Format::new().set_align(FormatAlign::Center),
    )?;

    for (col, title) in TABLE_HEADERS.iter().enumerate() {
        ws.write_with_format(4, col as u16, *title, &header_format)?;
    }

    // 明细按送货日期升序
    let mut sorted: Vec<&&LineItem> = items.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut total_amount = 0.0;
    for (i, item) in sorted.iter().enumerate() {
        let row = i as u32 + 5;
        ws.write_with_format(row, 0, item.date_display().as_str(), &cell_format)?;
        ws.write_with_format(
            row,
            1,
            format!("{} {}", item.product_name, item.spec).as_str(),
            &wrap_format,
        )?;
        ws.write_with_format(row, 2, item.unit.as_str(), &cell_format)?;
        ws.write_with_format(row, 3, item.quantity, &cell_format)?;
        ws.write_with_format(row, 4, item.unit_price, &cell_format)?;
        ws.write_with_format(row, 5, item.amount, &cell_format)?;
        ws.write_with_format(row, 6, "", &cell_format)?;
        total_amount += item.amount;
    }

    // 合计行：空两行后，大写在左、小写在右
    let summary_row = sorted.len() as u32 + 7;
    ws.merge_range(
        summary_row,
        0,
        summary_row,
        2,
        &format!("合计人民币大写：{}", rmb_upper(total_amount)),
        &Format::new().set_font_size(11),
    )?;
    ws.merge_range(
        summary_row,
        3,
        summary_row,
        6,
        &format!("人民币小写：{:.2}元", total_amount),
        &Format::new().set_font_size(11).set_align(FormatAlign::Right),
    )?;

    // 打印设置：A4 纵向，宽度压到一页，每页重复表头
    ws.set_paper_size(9);
    ws.set_portrait();
    ws.set_print_fit_to_pages(1, 0);
    ws.set_margins(0.5, 0.5, 0.75, 0.75, 0.3, 0.3);
    ws.set_repeat_rows(0, 4)?;

    workbook.save(dest)?;
    Ok(())
}

/// "2024-01" -> "2024年1月"
pub fn period_label(year_month: &str) -> String {
    let mut parts = year_month.splitn(2, '-');
    if let (Some(y), Some(m)) = (parts.next(), parts.next()) {
        if let (Ok(year), Ok(month)) = (y.parse::<i32>(), m.parse::<u32>()) {
            return format!("{}年{}月", year, month);
        }
    }
    year_month.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_label_formats_year_month() {
        assert_eq!(period_label("2024-01"), "2024年1月");
        assert_eq!(period_label("2024-11"), "2024年11月");
        assert_eq!(period_label("未知"), "未知");
    }
}
