//! Keyword classification for free-text shipment fields.
//!
//! The intake form sends location, product type, and work method as free
//! text, so categorical decisions are made by substring match against the
//! Korean terms customers actually type. Each category gets exactly one
//! classifier here so the matching rules stay centrally testable.

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

pub fn is_airport(location: &str) -> bool {
    location.contains("공항")
}

pub fn is_port(location: &str) -> bool {
    contains_any(location, &["인천", "항"])
}

pub fn is_new_port(location: &str) -> bool {
    location.contains("신항")
}

/// Incheon-area sites are the primary service area; anywhere else (평택항,
/// 경기권, unknown sites) may need separately-quoted transport.
pub fn in_primary_service_area(location: &str) -> bool {
    location.contains("인천")
}

pub fn is_bulky_product(text: &str) -> bool {
    contains_any(text, &["기저귀", "부피"])
}

pub fn is_alcohol_product(text: &str) -> bool {
    contains_any(text, &["주류", "유리"])
}

pub fn is_frozen_product(text: &str) -> bool {
    contains_any(text, &["냉동", "냉장"])
}

pub fn is_sack_product(text: &str) -> bool {
    contains_any(text, &["마대", "포대", "분말"])
}

pub fn is_sewing_method(method: &str) -> bool {
    contains_any(method, &["박음질", "재봉", "미싱"])
}

pub fn is_witness_method(method: &str) -> bool {
    contains_any(method, &["기타", "입회"])
}

pub fn has_urgency_keyword(memo: &str) -> bool {
    contains_any(memo, &["야간", "긴급", "급히"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_classes() {
        assert!(is_airport("인천공항 화물터미널"));
        assert!(!is_airport("인천항 보세창고"));
        assert!(is_port("인천항"));
        assert!(is_port("평택항")); // contains 항
        assert!(is_new_port("인천신항"));
        assert!(!is_new_port("인천항"));
    }

    #[test]
    fn primary_service_area_is_incheon() {
        assert!(in_primary_service_area("인천항"));
        assert!(in_primary_service_area("인천공항"));
        assert!(!in_primary_service_area("평택항"));
        assert!(!in_primary_service_area("경기권 창고"));
    }

    #[test]
    fn product_classes() {
        assert!(is_bulky_product("기저귀 박스"));
        assert!(is_alcohol_product("주류(유리병)"));
        assert!(is_frozen_product("냉동 수산물"));
        assert!(is_sack_product("분말 포대"));
        assert!(!is_sack_product("일반 잡화"));
    }

    #[test]
    fn method_and_memo_classes() {
        assert!(is_sewing_method("라벨 박음질"));
        assert!(is_sewing_method("미싱 작업"));
        assert!(is_witness_method("기타 (입회 필요)"));
        assert!(has_urgency_keyword("야간에 급히 부탁드립니다"));
        assert!(!has_urgency_keyword("다음주 아무때나 괜찮아요"));
    }
}
