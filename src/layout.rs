//! 送货单的固定版式：所有按位置取值的行列号集中在这里

/// 客户名称和日期所在的表头行
pub const HEADER_ROW: u32 = 6;
/// 客户名称列
pub const CUSTOMER_COL: u32 = 2;
/// 送货日期列
pub const DATE_COL: u32 = 8;

/// 明细数据起始行
pub const DATA_START_ROW: u32 = 10;

/// 货名列，同时用于识别合计行
pub const PRODUCT_COL: u32 = 1;
pub const SPEC_COL: u32 = 3;
pub const QUANTITY_COL: u32 = 5;
pub const UNIT_COL: u32 = 6;
pub const UNIT_PRICE_COL: u32 = 7;
pub const AMOUNT_COL: u32 = 8;

/// 货名列中出现该字样即视为合计行，之后的行全部忽略
pub const TOTAL_MARKER: &str = "合计";
