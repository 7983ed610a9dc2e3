//! 端到端：两张送货单 → 汇总工作簿 + 两份对账单，重复运行全部跳过

use calamine::{open_workbook_auto, DataType, Reader};
use std::fs;

use delivery_order_merger::sample::{write_delivery_order, SampleRow};
use delivery_order_merger::{run, CompanyConfig, Logger};

fn widget_row(quantity: f64, amount: f64) -> SampleRow<'static> {
    SampleRow {
        product_name: "Widget",
        spec: "",
        quantity,
        unit: "个",
        unit_price: 5.0,
        amount,
    }
}

fn find_row_by_text(
    range: &calamine::Range<DataType>,
    col: u32,
    text: &str,
) -> Option<u32> {
    (0..=range.end()?.0).find(|r| {
        matches!(range.get_value((*r, col)), Some(DataType::String(s)) if s == text)
    })
}

#[test]
fn end_to_end_two_months_then_idempotent_rerun() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("raw-data");
    let output = root.path().join("output");
    fs::create_dir_all(&source).unwrap();

    write_delivery_order(
        &source.join("order_jan.xlsx"),
        "A",
        "2024-01-05",
        &[widget_row(10.0, 50.0)],
    )
    .unwrap();
    write_delivery_order(
        &source.join("order_feb.xlsx"),
        "A",
        "2024-02-10",
        &[widget_row(4.0, 20.0)],
    )
    .unwrap();

    let log = Logger::silent();
    let config = CompanyConfig::default();

    let stats = run(&source, &output, &config, &log).unwrap();
    assert_eq!(stats.generated, 2);
    assert_eq!(stats.skipped, 0);

    let jan = output.join("A").join("statement_A_2024-01.xlsx");
    let feb = output.join("A").join("statement_A_2024-02.xlsx");
    assert!(jan.exists());
    assert!(feb.exists());

    // 汇总工作簿：Widget 总数量 14，总金额 70
    let merged = output.join("merged_delivery_orders.xlsx");
    let mut wb = open_workbook_auto(&merged).unwrap();
    let range = wb.worksheet_range("汇总").unwrap().unwrap();
    let row = find_row_by_text(&range, 0, "Widget").expect("汇总里找不到 Widget");
    assert_eq!(range.get_value((row, 3)), Some(&DataType::Float(14.0)));
    assert_eq!(range.get_value((row, 5)), Some(&DataType::Float(70.0)));
    assert_eq!(
        range.get_value((row, 6)),
        Some(&DataType::String("A".to_string()))
    );

    // 月份视图：两个月各一行
    let range = wb.worksheet_range("按月份分析").unwrap().unwrap();
    assert!(find_row_by_text(&range, 0, "2024-01").is_some());
    assert!(find_row_by_text(&range, 0, "2024-02").is_some());

    // 一月对账单：一条明细，金额 50，大写合计伍拾元整
    let mut wb = open_workbook_auto(&jan).unwrap();
    let range = wb.worksheet_range("对账单").unwrap().unwrap();
    assert_eq!(range.get_value((5, 5)), Some(&DataType::Float(50.0)));
    let total_cell = range.get_value((8, 0)).unwrap().to_string();
    assert!(total_cell.contains("伍拾元整"), "合计单元格内容: {}", total_cell);

    // 二月对账单合计 20
    let mut wb = open_workbook_auto(&feb).unwrap();
    let range = wb.worksheet_range("对账单").unwrap().unwrap();
    assert_eq!(range.get_value((5, 5)), Some(&DataType::Float(20.0)));

    // 第二次运行：不生成新文件，已有文件一个字节都不变
    let jan_bytes = fs::read(&jan).unwrap();
    let stats = run(&source, &output, &config, &log).unwrap();
    assert_eq!(stats.generated, 0);
    assert_eq!(stats.skipped, 2);
    assert_eq!(fs::read(&jan).unwrap(), jan_bytes);
}

#[test]
fn empty_source_directory_is_an_explicit_no_data_error() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("raw-data");
    let output = root.path().join("output");
    fs::create_dir_all(&source).unwrap();

    let err = run(&source, &output, &CompanyConfig::default(), &Logger::silent()).unwrap_err();
    assert!(err.to_string().contains("未提取到任何数据"));
    assert!(!output.join("merged_delivery_orders.xlsx").exists());
}

#[test]
fn customerless_orders_merge_but_produce_no_statements() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("raw-data");
    let output = root.path().join("output");
    fs::create_dir_all(&source).unwrap();

    write_delivery_order(&source.join("order.xlsx"), "", "2024-01-05", &[widget_row(1.0, 5.0)])
        .unwrap();

    let stats = run(&source, &output, &CompanyConfig::default(), &Logger::silent()).unwrap();
    assert_eq!(stats.generated, 0);
    assert_eq!(stats.skipped, 0);
    assert!(output.join("merged_delivery_orders.xlsx").exists());
}

#[test]
fn broken_file_is_isolated_from_the_rest_of_the_run() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("raw-data");
    let output = root.path().join("output");
    fs::create_dir_all(&source).unwrap();

    // 不是合法的 xlsx，提取时按单文件错误处理
    fs::write(source.join("broken.xlsx"), b"not a spreadsheet").unwrap();
    write_delivery_order(
        &source.join("good.xlsx"),
        "A",
        "2024-01-05",
        &[widget_row(10.0, 50.0)],
    )
    .unwrap();

    let (log, rx) = Logger::channel();
    let stats = run(&source, &output, &CompanyConfig::default(), &log).unwrap();
    drop(log);
    assert_eq!(stats.generated, 1);

    let lines: Vec<String> = rx.iter().collect();
    assert!(
        lines.iter().any(|l| l.contains("broken.xlsx") && l.contains("出错")),
        "日志里应有 broken.xlsx 的错误记录: {:?}",
        lines
    );
}

#[test]
fn discovery_is_recursive_and_skips_lock_files() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("raw-data");
    let nested = source.join("2024").join("01");
    fs::create_dir_all(&nested).unwrap();

    write_delivery_order(&nested.join("order.XLSX"), "A", "2024-01-05", &[widget_row(2.0, 10.0)])
        .unwrap();
    fs::write(source.join("~$order.xlsx"), b"lock").unwrap();

    let files = delivery_order_merger::scan_source_files(&source).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("2024/01/order.XLSX"));
}
