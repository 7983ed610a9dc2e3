//! 从单个送货单文件按固定位置提取明细记录

use crate::layout;
use crate::pipeline::Logger;
use crate::LineItem;
use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, DataType, Range, Reader};
use chrono::{Duration, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

/// 递归查找目录下所有的送货单文件（.xls / .xlsx，忽略 Excel 锁文件）
pub fn scan_source_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk_dir(root, &mut found)
        .with_context(|| format!("无法扫描目录: {}", root.display()))?;
    found.sort();
    Ok(found)
}

fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, out)?;
        } else if is_spreadsheet(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_spreadsheet(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.starts_with("~$") {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("xls") || ext.eq_ignore_ascii_case("xlsx")
    )
}

/// 逐个文件提取并拼接成总数据集。单个文件出错只记录日志，不中断整体处理
pub fn build_corpus(files: &[PathBuf], log: &Logger) -> Vec<LineItem> {
    let mut all = Vec::new();
    for file in files {
        log.line(format!("正在处理: {}", file.display()));
        match extract_file(file) {
            Ok(rows) => all.extend(rows),
            Err(e) => log.line(format!("  处理 {} 时出错: {:#}", file.display(), e)),
        }
    }
    all
}

/// 读取一个送货单文件的第一个工作表并提取明细
pub fn extract_file(path: &Path) -> Result<Vec<LineItem>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("无法打开文件: {}", path.display()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("工作簿没有工作表")?
        .clone();
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("无法读取工作表: {}", sheet_name))??;

    let source_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    extract_from_range(&range, &source_file)
}

/// 按固定版式扫描整张表格。客户和日期缺失时降级为空值，不报错
pub fn extract_from_range(range: &Range<DataType>, source_file: &str) -> Result<Vec<LineItem>> {
    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };

    let customer = cell_text(range.get_value((layout::HEADER_ROW, layout::CUSTOMER_COL)));
    let date = cell_date(range.get_value((layout::HEADER_ROW, layout::DATE_COL)));

    let mut items = Vec::new();
    for row in layout::DATA_START_ROW..=last_row {
        let product_raw = cell_text(range.get_value((row, layout::PRODUCT_COL)));
        // 遇到合计行就结束，之后的内容不属于明细
        if product_raw.contains(layout::TOTAL_MARKER) {
            break;
        }

        let product_name = collapse_breaks(&product_raw);
        if product_name.is_empty() {
            continue;
        }

        // 只保留同时有货名和数量的行
        let quantity = cell_number(range.get_value((row, layout::QUANTITY_COL)))
            .with_context(|| format!("第 {} 行数量无效", row + 1))?;
        let quantity = match quantity {
            Some(q) if q != 0.0 => q,
            _ => continue,
        };

        let unit_price = cell_number(range.get_value((row, layout::UNIT_PRICE_COL)))
            .with_context(|| format!("第 {} 行单价无效", row + 1))?
            .unwrap_or(0.0);
        let amount = cell_number(range.get_value((row, layout::AMOUNT_COL)))
            .with_context(|| format!("第 {} 行金额无效", row + 1))?
            .unwrap_or(0.0);

        items.push(LineItem {
            product_name,
            spec: cell_text(range.get_value((row, layout::SPEC_COL))),
            quantity,
            unit: cell_text(range.get_value((row, layout::UNIT_COL))),
            unit_price,
            amount,
            customer: customer.clone(),
            date,
            source_file: source_file.to_string(),
        });
    }
    Ok(items)
}

fn collapse_breaks(s: &str) -> String {
    s.replace('\n', " ").replace('\r', " ").trim().to_string()
}

fn cell_text(cell: Option<&DataType>) -> String {
    match cell {
        None | Some(DataType::Empty) => String::new(),
        Some(c) => c.to_string().trim().to_string(),
    }
}

/// 数字单元格：空为 None，文本必须能解析成数字，否则整个文件按出错处理
fn cell_number(cell: Option<&DataType>) -> Result<Option<f64>> {
    match cell {
        None | Some(DataType::Empty) => Ok(None),
        Some(DataType::Float(f)) => Ok(Some(*f)),
        Some(DataType::Int(i)) => Ok(Some(*i as f64)),
        Some(DataType::DateTime(f)) => Ok(Some(*f)),
        Some(DataType::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse::<f64>() {
                Ok(v) => Ok(Some(v)),
                Err(_) => bail!("无法解析数字: {}", s),
            }
        }
        Some(other) => bail!("无法解析数字: {}", other),
    }
}

fn cell_date(cell: Option<&DataType>) -> Option<NaiveDate> {
    match cell {
        Some(DataType::DateTime(f)) => serial_to_date(*f),
        Some(DataType::Float(f)) => serial_to_date(*f),
        Some(DataType::Int(i)) => serial_to_date(*i as f64),
        Some(DataType::String(s)) => parse_date_text(s),
        _ => None,
    }
}

/// Excel 序列日期，纪元为 1899-12-30
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .map(|epoch| epoch + Duration::days(serial as i64))
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    // 去掉可能带着的时间部分
    let s = s.trim();
    let head = s
        .split(|c| c == ' ' || c == 'T')
        .next()
        .unwrap_or(s);
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日", "%Y.%m.%d"];
    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(head, f).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_grid() -> Range<DataType> {
        Range::new((0, 0), (24, 10))
    }

    fn set_text(grid: &mut Range<DataType>, row: u32, col: u32, s: &str) {
        grid.set_value((row, col), DataType::String(s.to_string()));
    }

    fn set_num(grid: &mut Range<DataType>, row: u32, col: u32, v: f64) {
        grid.set_value((row, col), DataType::Float(v));
    }

    fn data_row(grid: &mut Range<DataType>, row: u32, product: &str, qty: f64, price: f64, amount: f64) {
        set_text(grid, row, layout::PRODUCT_COL, product);
        set_num(grid, row, layout::QUANTITY_COL, qty);
        set_num(grid, row, layout::UNIT_PRICE_COL, price);
        set_num(grid, row, layout::AMOUNT_COL, amount);
    }

    #[test]
    fn extracts_header_and_rows_until_total_marker() {
        let mut grid = empty_grid();
        set_text(&mut grid, layout::HEADER_ROW, layout::CUSTOMER_COL, "甲公司");
        set_text(&mut grid, layout::HEADER_ROW, layout::DATE_COL, "2024-01-05");
        data_row(&mut grid, 10, "螺丝", 100.0, 0.5, 50.0);
        set_text(&mut grid, 10, layout::SPEC_COL, "M6");
        set_text(&mut grid, 10, layout::UNIT_COL, "个");
        data_row(&mut grid, 11, "垫片", 20.0, 1.0, 20.0);
        set_text(&mut grid, 12, layout::PRODUCT_COL, "合计金额");
        data_row(&mut grid, 13, "合计行之后", 5.0, 1.0, 5.0);

        let items = extract_from_range(&grid, "a.xlsx").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, "螺丝");
        assert_eq!(items[0].spec, "M6");
        assert_eq!(items[0].unit, "个");
        assert_eq!(items[0].customer, "甲公司");
        assert_eq!(
            items[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(items[0].year_month().as_deref(), Some("2024-01"));
        assert_eq!(items[1].product_name, "垫片");
    }

    #[test]
    fn missing_customer_cell_degrades_to_empty() {
        let mut grid = empty_grid();
        data_row(&mut grid, 10, "螺丝", 10.0, 1.0, 10.0);

        let items = extract_from_range(&grid, "a.xlsx").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].customer, "");
        assert!(items[0].date.is_none());
    }

    #[test]
    fn rows_without_product_or_quantity_are_dropped() {
        let mut grid = empty_grid();
        // 缺数量
        set_text(&mut grid, 10, layout::PRODUCT_COL, "只有货名");
        // 缺货名
        set_num(&mut grid, 11, layout::QUANTITY_COL, 3.0);
        // 数量为 0
        data_row(&mut grid, 12, "零数量", 0.0, 1.0, 0.0);
        data_row(&mut grid, 13, "有效", 2.0, 1.0, 2.0);

        let items = extract_from_range(&grid, "a.xlsx").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "有效");
    }

    #[test]
    fn optional_columns_default_instead_of_failing() {
        let mut grid = empty_grid();
        set_text(&mut grid, 10, layout::PRODUCT_COL, "裸货名");
        set_num(&mut grid, 10, layout::QUANTITY_COL, 4.0);

        let items = extract_from_range(&grid, "a.xlsx").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].spec, "");
        assert_eq!(items[0].unit, "");
        assert_eq!(items[0].unit_price, 0.0);
        assert_eq!(items[0].amount, 0.0);
    }

    #[test]
    fn product_line_breaks_collapse_to_spaces() {
        let mut grid = empty_grid();
        set_text(&mut grid, 10, layout::PRODUCT_COL, "长货名\n第二行");
        set_num(&mut grid, 10, layout::QUANTITY_COL, 1.0);

        let items = extract_from_range(&grid, "a.xlsx").unwrap();
        assert_eq!(items[0].product_name, "长货名 第二行");
    }

    #[test]
    fn amount_is_taken_verbatim_not_recomputed() {
        let mut grid = empty_grid();
        // 金额与 数量×单价 不一致，按单据原值保留
        data_row(&mut grid, 10, "特价货", 10.0, 5.0, 999.0);

        let items = extract_from_range(&grid, "a.xlsx").unwrap();
        assert_eq!(items[0].amount, 999.0);
    }

    #[test]
    fn garbage_numeric_cell_fails_the_file() {
        let mut grid = empty_grid();
        set_text(&mut grid, 10, layout::PRODUCT_COL, "货");
        set_text(&mut grid, 10, layout::QUANTITY_COL, "十个");

        assert!(extract_from_range(&grid, "a.xlsx").is_err());
    }

    #[test]
    fn serial_dates_convert() {
        // 45292 = 2024-01-01
        assert_eq!(
            serial_to_date(45292.0),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(serial_to_date(0.0), None);
    }

    #[test]
    fn date_text_formats_parse() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 10);
        assert_eq!(parse_date_text("2024-02-10"), d);
        assert_eq!(parse_date_text("2024/02/10"), d);
        assert_eq!(parse_date_text("2024年02月10日"), d);
        assert_eq!(parse_date_text("2024-02-10 08:30:00"), d);
        assert_eq!(parse_date_text("随便写的"), None);
    }
}
