//! リリースタグ一覧から「最新」バージョンを選ぶ畳み込み。
//!
//! 比較は major.minor を浮動小数として読むゆるい規則に従う。
//! 同値の場合は最後のドット以降の整数が大きいか等しい候補で上書きするため、
//! 厳密な最大値ではなく「最後に現れた大きいか等しいもの」が残る。

use super::enterprise_release::leading_integer;

/// タグ一覧を畳み込み、最終的なバージョン文字列を返す。
///
/// `seed` は前回までに確定しているバージョン（未取得なら "0"）。
/// `prefix` で始まらないタグ、空のタグは読み飛ばす。
pub fn fold_release_tags<'a, I>(seed: &str, prefix: &str, tag_names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    tag_names
        .into_iter()
        .filter(|name| !name.is_empty())
        .filter_map(|name| name.strip_prefix(prefix))
        .fold(seed.to_string(), |best, candidate| fold_step(&best, candidate))
}

/// 1 タグ分の畳み込み。更新後のベストを返す。
pub fn fold_step(best: &str, candidate: &str) -> String {
    let candidate_value = leading_float(candidate);
    let best_value = leading_float(best);

    if candidate_value > best_value {
        return candidate.to_string();
    }

    #[allow(clippy::float_cmp)]
    let same_series = candidate_value == best_value;
    if same_series && trailing_component(candidate) >= trailing_component(best) {
        return candidate.to_string();
    }

    best.to_string()
}

/// 先頭の `<digits>[.<digits>]` を浮動小数として読む。"5.12.1" は 5.12。
pub(crate) fn leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let int_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if int_end == 0 {
        return 0.0;
    }

    let rest = &s[int_end..];
    let end = match rest.strip_prefix('.') {
        Some(frac) => {
            let frac_len = frac
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(frac.len());
            if frac_len == 0 {
                int_end
            } else {
                int_end + 1 + frac_len
            }
        }
        None => int_end,
    };

    s[..end].parse::<f64>().unwrap_or(0.0)
}

/// 最後のドット以降を整数として読む。ドットがない場合は先頭 1 文字を除いた残りを読む。
pub(crate) fn trailing_component(s: &str) -> i64 {
    match s.rfind('.') {
        Some(idx) => leading_integer(&s[idx + 1..]),
        None => s.get(1..).map_or(0, leading_integer),
    }
}
