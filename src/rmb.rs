//! 人民币金额的大写表示

const DIGITS: [&str; 10] = ["零", "壹", "贰", "叁", "肆", "伍", "陆", "柒", "捌", "玖"];
const PLACES: [&str; 4] = ["", "拾", "佰", "仟"];

/// 将非负金额转换为中文大写（元到分）。先四舍五入到分再转换，结果确定且可复现
pub fn rmb_upper(amount: f64) -> String {
    let cents = (amount * 100.0).round() as u64;
    let yuan = cents / 100;
    let jiao = ((cents / 10) % 10) as usize;
    let fen = (cents % 10) as usize;

    let mut s = if yuan == 0 {
        "零".to_string()
    } else {
        integer_upper(yuan)
    };
    s.push_str("元");

    if jiao == 0 && fen == 0 {
        s.push_str("整");
        return s;
    }
    if jiao != 0 {
        s.push_str(DIGITS[jiao]);
        s.push_str("角");
    } else if yuan != 0 {
        // 角位为零而分位不为零时补一个零：壹拾元零伍分
        s.push_str("零");
    }
    if fen != 0 {
        s.push_str(DIGITS[fen]);
        s.push_str("分");
    }
    s
}

/// 整数元部分，按万、亿分节；节单位只在该节不为零时出现
fn integer_upper(n: u64) -> String {
    if n >= 100_000_000 {
        let mut s = integer_upper(n / 100_000_000);
        s.push_str("亿");
        let rest = n % 100_000_000;
        if rest > 0 {
            // 亿位或千万位为零说明中间有空位，节间补零
            if rest < 10_000_000 || (n / 100_000_000) % 10 == 0 {
                s.push_str("零");
            }
            s.push_str(&integer_upper(rest));
        }
        s
    } else if n >= 10_000 {
        let mut s = group_upper(n / 10_000);
        s.push_str("万");
        let rest = n % 10_000;
        if rest > 0 {
            if rest < 1000 || (n / 10_000) % 10 == 0 {
                s.push_str("零");
            }
            s.push_str(&group_upper(rest));
        }
        s
    } else {
        group_upper(n)
    }
}

/// 一节（1..=9999）的大写。零位不带单位，连续的零收敛成一个，末尾的零丢弃
fn group_upper(n: u64) -> String {
    let mut s = String::new();
    let mut zero_pending = false;
    for place in (0..4u32).rev() {
        let d = (n / 10u64.pow(place)) % 10;
        if d == 0 {
            if !s.is_empty() {
                zero_pending = true;
            }
        } else {
            if zero_pending {
                s.push_str("零");
                zero_pending = false;
            }
            s.push_str(DIGITS[d as usize]);
            s.push_str(PLACES[place as usize]);
        }
    }
    s
}
