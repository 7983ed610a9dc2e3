//! 把总数据集按不同维度汇总成五张分析视图

use crate::LineItem;
use std::collections::{BTreeMap, BTreeSet};

/// 月份键缺失时在分析视图里显示的占位
pub const UNKNOWN_MONTH: &str = "未知";

/// 通用分组：按键聚到 BTreeMap，迭代顺序稳定且按键有序
pub fn group_by<'a, K, F>(items: &'a [LineItem], key: F) -> BTreeMap<K, Vec<&'a LineItem>>
where
    K: Ord,
    F: Fn(&LineItem) -> K,
{
    let mut groups: BTreeMap<K, Vec<&LineItem>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

/// 按货名+规格+单位汇总（含来源文件列）
#[derive(Debug, Clone)]
pub struct ItemSummary {
    pub product_name: String,
    pub spec: String,
    pub unit: String,
    pub quantity: f64,
    pub avg_price: Option<f64>,
    pub amount: f64,
    pub customers: String,
    pub files: String,
}

#[derive(Debug, Clone)]
pub struct CustomerSummary {
    pub customer: String,
    pub orders: usize,
    pub quantity: f64,
    pub amount: f64,
    pub avg_price: Option<f64>,
}

/// 与 ItemSummary 同形，但不带来源文件列
#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub product_name: String,
    pub spec: String,
    pub unit: String,
    pub quantity: f64,
    pub avg_price: Option<f64>,
    pub amount: f64,
    pub customers: String,
}

#[derive(Debug, Clone)]
pub struct MonthSummary {
    pub month: String,
    pub orders: usize,
    pub customers: usize,
    pub quantity: f64,
    pub amount: f64,
    pub avg_order_amount: f64,
}

#[derive(Debug, Clone)]
pub struct CustomerMonthSummary {
    pub customer: String,
    pub month: String,
    pub orders: usize,
    pub quantity: f64,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct Aggregates {
    pub summary: Vec<ItemSummary>,
    pub by_customer: Vec<CustomerSummary>,
    pub by_product: Vec<ProductSummary>,
    pub by_month: Vec<MonthSummary>,
    pub by_customer_month: Vec<CustomerMonthSummary>,
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// 平均单价 = 金额 / 数量；数量为 0 时没有意义，返回 None 而不是无穷大
pub fn avg_price(amount: f64, quantity: f64) -> Option<f64> {
    if quantity == 0.0 {
        None
    } else {
        Some(round2(amount / quantity))
    }
}

fn sum_quantity(items: &[&LineItem]) -> f64 {
    items.iter().map(|i| i.quantity).sum()
}

fn sum_amount(items: &[&LineItem]) -> f64 {
    items.iter().map(|i| i.amount).sum()
}

/// 去重、排序后用逗号连接
fn joined_set<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let set: BTreeSet<&str> = values.filter(|s| !s.is_empty()).collect();
    set.into_iter().collect::<Vec<_>>().join(", ")
}

fn month_key(item: &LineItem) -> String {
    item.year_month()
        .unwrap_or_else(|| UNKNOWN_MONTH.to_string())
}

pub fn aggregate(corpus: &[LineItem]) -> Aggregates {
    // 汇总：货名+规格+单位
    let mut summary: Vec<ItemSummary> = group_by(corpus, |i| {
        (i.product_name.clone(), i.spec.clone(), i.unit.clone())
    })
    .into_iter()
    .map(|((product_name, spec, unit), items)| {
        let quantity = sum_quantity(&items);
        let amount = sum_amount(&items);
        ItemSummary {
            product_name,
            spec,
            unit,
            quantity,
            avg_price: avg_price(amount, quantity),
            amount,
            customers: joined_set(items.iter().map(|i| i.customer.as_str())),
            files: joined_set(items.iter().map(|i| i.source_file.as_str())),
        }
    })
    .collect();
    sort_by_amount_desc(&mut summary, |s| s.amount);

    // 按客户
    let mut by_customer: Vec<CustomerSummary> = group_by(corpus, |i| i.customer.clone())
        .into_iter()
        .map(|(customer, items)| {
            let quantity = sum_quantity(&items);
            let amount = sum_amount(&items);
            CustomerSummary {
                customer,
                orders: items.len(),
                quantity,
                amount,
                avg_price: avg_price(amount, quantity),
            }
        })
        .collect();
    sort_by_amount_desc(&mut by_customer, |s| s.amount);

    // 按产品：与汇总同键，少来源文件列
    let mut by_product: Vec<ProductSummary> = group_by(corpus, |i| {
        (i.product_name.clone(), i.spec.clone(), i.unit.clone())
    })
    .into_iter()
    .map(|((product_name, spec, unit), items)| {
        let quantity = sum_quantity(&items);
        let amount = sum_amount(&items);
        ProductSummary {
            product_name,
            spec,
            unit,
            quantity,
            avg_price: avg_price(amount, quantity),
            amount,
            customers: joined_set(items.iter().map(|i| i.customer.as_str())),
        }
    })
    .collect();
    sort_by_amount_desc(&mut by_product, |s| s.amount);

    // 按月份：BTreeMap 的键序就是月份升序
    let by_month: Vec<MonthSummary> = group_by(corpus, month_key)
        .into_iter()
        .map(|(month, items)| {
            let orders = items.len();
            let amount = sum_amount(&items);
            let customers: BTreeSet<&str> = items
                .iter()
                .map(|i| i.customer.as_str())
                .filter(|c| !c.is_empty())
                .collect();
            MonthSummary {
                month,
                orders,
                customers: customers.len(),
                quantity: sum_quantity(&items),
                amount,
                avg_order_amount: round2(amount / orders as f64),
            }
        })
        .collect();

    // 客户月度交叉：键序即（客户，月份）升序
    let by_customer_month: Vec<CustomerMonthSummary> =
        group_by(corpus, |i| (i.customer.clone(), month_key(i)))
            .into_iter()
            .map(|((customer, month), items)| CustomerMonthSummary {
                customer,
                month,
                orders: items.len(),
                quantity: sum_quantity(&items),
                amount: sum_amount(&items),
            })
            .collect();

    Aggregates {
        summary,
        by_customer,
        by_product,
        by_month,
        by_customer_month,
    }
}

fn sort_by_amount_desc<T, F: Fn(&T) -> f64>(rows: &mut [T], amount: F) {
    rows.sort_by(|a, b| {
        amount(b)
            .partial_cmp(&amount(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
