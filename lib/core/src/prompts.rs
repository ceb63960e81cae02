//! Prompt construction for the chat-model capability
//!
//! All prompts ask for a bare answer with no extra formatting, so call sites
//! can compare the response literally against the offered options.

/// Pick the canonical attribute name semantically closest to `name`.
#[must_use]
pub fn closest_attribute(name: &str, canonical_names: &[&str]) -> String {
    format!(
        "在以下属性中，找出与\"{}\"语义最相似的一项:\n{}\n\n请直接返回最匹配的属性名称，不要有其他内容。",
        name,
        canonical_names.join(", ")
    )
}

/// Pick the candidate value semantically closest to `query`.
///
/// Includes the heel-height taxonomy so a numeric query maps onto a range
/// label; the local numeric pre-step in the matcher handles plain
/// measurements before this prompt is ever sent.
#[must_use]
pub fn closest_value(query: &str, candidates: &[String]) -> String {
    format!(
        "在以下选项中，找出与\"{}\"语义最接近或最相关的一项：\n{}\n\n如果查询值是高度数字，请按鞋跟高度分类返回对应选项：平跟小于1cm、低跟1-3cm、中跟3-5cm、高跟5-8cm、超高跟8cm以上。\n请直接返回最匹配的选项，不要有其他内容。",
        query,
        candidates.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_carry_options() {
        let prompt = closest_attribute("鞋帮材质", &["鞋面材质", "鞋底材质"]);
        assert!(prompt.contains("鞋帮材质"));
        assert!(prompt.contains("鞋面材质, 鞋底材质"));

        let prompt = closest_value("牛皮", &["真皮".to_string(), "人造革".to_string()]);
        assert!(prompt.contains("真皮, 人造革"));
        assert!(prompt.contains("牛皮"));
    }
}
