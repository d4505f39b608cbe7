/// エンタープライズリポジトリ URL 中のバージョン置換プレースホルダー。
pub const VERSION_PLACEHOLDER: &str = "<VERSION>";

/// 製品バージョンからエンタープライズリリース系列（major.minor）を求める。
///
/// パッチ部分を落とし、minor を直下の偶数へ切り下げる。
/// エンタープライズリリースは偶数 minor でのみ公開される。
/// ドットが 2 つ未満のバージョンは正規化できないため None を返す。
pub fn enterprise_release(product_version: &str) -> Option<String> {
    let without_patch = &product_version[..product_version.rfind('.')?];
    let minor_idx = without_patch.rfind('.')?;
    let major = &without_patch[..minor_idx];
    let mut minor = leading_integer(&without_patch[minor_idx + 1..]);
    if minor % 2 != 0 {
        minor -= 1;
    }
    Some(format!("{}.{}", major, minor))
}

/// テンプレートの <VERSION> をエンタープライズリリース系列で置換した URL を返す。
pub fn enterprise_repo_url(template: &str, product_version: &str) -> Option<String> {
    enterprise_release(product_version).map(|release| template.replace(VERSION_PLACEHOLDER, &release))
}

/// 先頭の数字列を整数として読む。数字がなければ 0。
pub(crate) fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "https://downloads.opennebula.systems/repo/<VERSION>/";

    #[test]
    fn test_even_minor_is_kept() {
        assert_eq!(enterprise_release("5.12.4").as_deref(), Some("5.12"));
    }

    #[test]
    fn test_odd_minor_is_rounded_down() {
        assert_eq!(enterprise_release("5.11.80").as_deref(), Some("5.10"));
        assert_eq!(enterprise_release("6.1.0").as_deref(), Some("6.0"));
    }

    #[test]
    fn test_minor_zero_stays_zero() {
        assert_eq!(enterprise_release("6.0.1").as_deref(), Some("6.0"));
    }

    #[test]
    fn test_version_without_patch_cannot_be_normalized() {
        assert!(enterprise_release("5.12").is_none());
        assert!(enterprise_release("5").is_none());
        assert!(enterprise_release("").is_none());
    }

    #[test]
    fn test_repo_url_substitutes_version() {
        assert_eq!(
            enterprise_repo_url(TEMPLATE, "5.13.85").as_deref(),
            Some("https://downloads.opennebula.systems/repo/5.12/")
        );
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("12"), 12);
        assert_eq!(leading_integer("12rc1"), 12);
        assert_eq!(leading_integer("rc"), 0);
        assert_eq!(leading_integer(""), 0);
    }
}
