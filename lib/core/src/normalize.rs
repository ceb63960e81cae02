//! Raw value cleanup
//!
//! Database fields and model answers arrive with label prefixes, stray
//! punctuation, and composite listings. These helpers strip them down to the
//! bare value before matching.

/// Label prefixes that wrap a value in free-text fields.
const FILLER_LABELS: [&str; 3] = ["材质：", "主要成分：", "类型："];

/// Punctuation stripped from values wholesale.
const STRIP_CHARS: [char; 12] = [
    '。', '！', '？', '；', '：', '、', '（', '）', '(', ')', '"', '\'',
];

/// Separators joining multiple materials in one composite string.
const MATERIAL_SEPARATORS: [&str; 5] = ["+", "，", ",", "、", "/"];

/// Strip filler labels and punctuation from a raw attribute value.
#[must_use]
pub fn clean_attribute_value(value: &str) -> String {
    let mut cleaned = value.to_string();
    for label in FILLER_LABELS {
        cleaned = cleaned.replace(label, "");
    }
    cleaned.retain(|c| !STRIP_CHARS.contains(&c));
    cleaned.trim().to_string()
}

/// Keep the first-listed material of a composite material string.
///
/// "牛皮革+织物" → "牛皮革"; a string with no separator is returned unchanged.
#[must_use]
pub fn extract_primary_material(material: &str) -> String {
    if material.is_empty() {
        return String::new();
    }
    for sep in MATERIAL_SEPARATORS {
        if let Some((first, _)) = material.split_once(sep) {
            return first.trim().to_string();
        }
    }
    material.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_label_and_brackets() {
        assert_eq!(clean_attribute_value("材质：真皮(精选)"), "真皮精选");
        assert_eq!(clean_attribute_value("类型：拉链。"), "拉链");
        assert_eq!(clean_attribute_value("  真皮  "), "真皮");
        assert_eq!(clean_attribute_value(""), "");
    }

    #[test]
    fn test_primary_material_split() {
        assert_eq!(extract_primary_material("牛皮革+织物"), "牛皮革");
        assert_eq!(extract_primary_material("真皮，织物"), "真皮");
        assert_eq!(extract_primary_material("头层牛皮/布料"), "头层牛皮");
        assert_eq!(extract_primary_material("真皮"), "真皮");
        assert_eq!(extract_primary_material(""), "");
    }
}
