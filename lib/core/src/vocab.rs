//! Controlled-vocabulary tables
//!
//! Static data driving the pipeline: attribute-name aliases, per-attribute
//! value maps (standard value → trigger substrings), ordered category keyword
//! sets, and the image questions asked per category. Loaded once at startup
//! and treated as read-only for the process lifetime.
//!
//! The built-in defaults cover the Chinese footwear schema; a JSON file can
//! replace any table without code changes.

use crate::classifier::Category;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One canonical attribute name and its accepted alias spellings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasEntry {
    pub canonical: String,
    pub aliases: Vec<String>,
}

/// One standard value and the substrings/synonyms that imply it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardValue {
    pub value: String,
    pub triggers: Vec<String>,
}

/// Value map for one attribute. Declared order is match priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueMapEntry {
    pub attribute: String,
    pub values: Vec<StandardValue>,
}

/// Keyword set for one category. The surrounding list order is the
/// classification priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Natural-language questions asked of the vision model, per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageQuestions {
    pub closure: String,
    pub toe_style: String,
    pub heel_shape: String,
    pub opening_depth: String,
    pub style: String,
    pub shoe_shape: String,
    pub heel_height: String,
    pub tube_height: String,
    pub platform_height: String,
}

impl Default for ImageQuestions {
    fn default() -> Self {
        Self {
            closure: "这双鞋的闭合方式是什么（如系带、拉链、一脚蹬、魔术贴等）？请只回答闭合方式，不要有其他内容。".to_string(),
            toe_style: "这双鞋的鞋头款式是什么（如圆头、尖头、方头等）？请只回答鞋头款式，不要有其他内容。".to_string(),
            heel_shape: "这双鞋的鞋跟款式是什么（如粗跟、细跟、坡跟、平跟等）？请只回答鞋跟款式，不要有其他内容。".to_string(),
            opening_depth: "这双鞋的开口深度是什么（如浅口、中口、深口等）？请只回答开口深度，不要有其他内容。".to_string(),
            style: "这双鞋的风格是什么（如休闲、商务、运动、时尚等）？请只回答风格，不要有其他内容。".to_string(),
            shoe_shape: "这双鞋的款式是什么（如单鞋、凉鞋、短靴、长靴等）？请只回答款式，不要有其他内容。".to_string(),
            heel_height: "这双鞋的鞋跟高度大约是多少厘米？请只回答高度，不要有其他内容。".to_string(),
            tube_height: "这双靴子的靴筒高度大约是多少厘米？请只回答高度，不要有其他内容。".to_string(),
            platform_height: "这双鞋的鞋底厚度大约是多少厘米？请只回答厚度，不要有其他内容。".to_string(),
        }
    }
}

/// The complete vocabulary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub aliases: Vec<AliasEntry>,
    pub value_map: Vec<ValueMapEntry>,
    pub categories: Vec<CategoryKeywords>,
    /// Sub-keywords of a season attribute name that switch it to
    /// release-year semantics.
    pub release_year_keywords: Vec<String>,
    /// Size sub-category keyword lists.
    pub heel_keywords: Vec<String>,
    pub tube_keywords: Vec<String>,
    pub platform_keywords: Vec<String>,
    pub image_questions: ImageQuestions,
    /// Supported image file extensions, lowercase, without the dot.
    pub image_extensions: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            aliases: default_aliases(),
            value_map: default_value_map(),
            categories: default_categories(),
            release_year_keywords: vec!["上市年份".to_string()],
            heel_keywords: str_vec(&["后跟高", "鞋跟高"]),
            tube_keywords: str_vec(&["靴筒高"]),
            platform_keywords: str_vec(&["底厚", "台高", "厚度"]),
            image_questions: ImageQuestions::default(),
            image_extensions: str_vec(&["jpg", "jpeg", "png", "webp"]),
        }
    }
}

impl Vocabulary {
    /// Load a vocabulary from a JSON file. Missing tables keep their
    /// built-in defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// All canonical attribute names, in declared order.
    #[must_use]
    pub fn canonical_names(&self) -> Vec<&str> {
        self.aliases.iter().map(|e| e.canonical.as_str()).collect()
    }

    /// Resolve a raw name that is already canonical or a known alias.
    /// First declared entry wins if the alias data is ambiguous.
    #[must_use]
    pub fn canonicalize(&self, name: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|e| e.canonical == name || e.aliases.iter().any(|a| a == name))
            .map(|e| e.canonical.as_str())
    }

    /// Value map for one attribute, if it has one.
    #[must_use]
    pub fn value_entries(&self, attribute: &str) -> Option<&ValueMapEntry> {
        self.value_map.iter().find(|e| e.attribute == attribute)
    }

    /// Classify a raw attribute name by ordered keyword containment.
    /// The first category whose keyword set hits wins; `General` is the
    /// catch-all.
    #[must_use]
    pub fn category_for(&self, raw_name: &str) -> Category {
        self.categories
            .iter()
            .find(|set| set.keywords.iter().any(|k| raw_name.contains(k.as_str())))
            .map(|set| set.category)
            .unwrap_or(Category::General)
    }

    /// Whether a file extension (without the dot) is an accepted image format.
    #[must_use]
    pub fn supports_image_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.image_extensions.iter().any(|e| *e == ext)
    }
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn alias(canonical: &str, aliases: &[&str]) -> AliasEntry {
    AliasEntry {
        canonical: canonical.to_string(),
        aliases: str_vec(aliases),
    }
}

fn standard(value: &str, triggers: &[&str]) -> StandardValue {
    StandardValue {
        value: value.to_string(),
        triggers: str_vec(triggers),
    }
}

fn default_aliases() -> Vec<AliasEntry> {
    vec![
        alias("鞋面材质", &["帮面材质", "靴筒面材质", "鞋帮材质"]),
        alias("鞋底材质", &["鞋底材料", "鞋底材料类型"]),
        alias("鞋垫材质", &["鞋垫材料", "鞋垫材料类型"]),
        alias("内里材质", &["鞋面内里材质", "靴筒内里材质"]),
        alias("闭合方式", &["鞋子闭合方式", "鞋扣方式"]),
        alias("开口深度", &["开口大小"]),
        alias("风格", &["鞋子风格"]),
        alias("款式", &["鞋子款式"]),
        alias("鞋头款式", &["鞋头样式", "鞋尖样式"]),
        alias("鞋跟款式", &["鞋跟样式", "后跟样式"]),
        alias("季节", &["适用季节", "使用季节", "上市年份季节"]),
        alias("后跟高", &["鞋跟高度", "跟高", "鞋后跟高度"]),
        alias("靴筒高度", &["靴筒高", "筒高"]),
        alias("鞋底厚度", &["前底厚度", "台高", "鞋底高度", "前底高度"]),
    ]
}

fn default_value_map() -> Vec<ValueMapEntry> {
    vec![
        ValueMapEntry {
            attribute: "材质".to_string(),
            values: vec![
                standard("真皮", &["头层牛皮", "牛皮", "真牛皮", "二层牛皮(除牛反绒)", "二层猪皮"]),
                standard("人造革", &["PU", "PU革", "合成革", "人工革"]),
                standard("织物", &["布料", "纺织物", "纺织"]),
            ],
        },
        ValueMapEntry {
            attribute: "闭合方式".to_string(),
            values: vec![
                standard("系带", &["鞋带", "系鞋带"]),
                standard("魔术贴", &["粘扣", "魔鬼贴", "尼龙贴"]),
                standard("拉链", &["侧拉链"]),
                standard("套脚", &["一脚蹬", "懒人", "无扣", "直接套"]),
            ],
        },
        ValueMapEntry {
            attribute: "后跟高".to_string(),
            values: vec![
                standard("低跟(1-3cm)", &["1cm", "2cm", "3cm", "1-3cm", "低跟"]),
                standard("中跟(3-5cm)", &["3-5cm", "4cm", "5cm", "中跟"]),
                standard("高跟(5-8cm)", &["5-8cm", "6cm", "7cm", "8cm", "高跟"]),
                standard("超高跟(8cm以上)", &["8cm以上", "9cm", "10cm", "超高跟"]),
                standard("平跟(小于1cm)", &["0cm", "0.5cm", "1cm以下", "平跟"]),
            ],
        },
    ]
}

fn default_categories() -> Vec<CategoryKeywords> {
    // Order is the classification priority. Names like "鞋跟高度" contain
    // both size and heel-shape keywords, so size must run first.
    vec![
        CategoryKeywords {
            category: Category::Season,
            keywords: str_vec(&["季节"]),
        },
        CategoryKeywords {
            category: Category::Material,
            keywords: str_vec(&["材质", "面料", "帮面", "靴筒面"]),
        },
        CategoryKeywords {
            category: Category::Size,
            keywords: str_vec(&["高度", "厚度", "后跟高", "靴筒高", "鞋跟高", "跟高", "台高"]),
        },
        CategoryKeywords {
            category: Category::Closure,
            keywords: str_vec(&["闭合方式", "鞋扣"]),
        },
        CategoryKeywords {
            category: Category::ToeStyle,
            keywords: str_vec(&["鞋头", "鞋尖"]),
        },
        CategoryKeywords {
            category: Category::HeelShape,
            keywords: str_vec(&["鞋跟款式", "鞋跟样式", "后跟样式", "鞋跟"]),
        },
        CategoryKeywords {
            category: Category::OpeningDepth,
            keywords: str_vec(&["开口"]),
        },
        CategoryKeywords {
            category: Category::Style,
            keywords: str_vec(&["风格"]),
        },
        CategoryKeywords {
            category: Category::ShoeShape,
            keywords: str_vec(&["款式", "鞋型"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_exact_and_alias() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.canonicalize("鞋面材质"), Some("鞋面材质"));
        assert_eq!(vocab.canonicalize("帮面材质"), Some("鞋面材质"));
        assert_eq!(vocab.canonicalize("适用季节"), Some("季节"));
        assert_eq!(vocab.canonicalize("不存在的属性"), None);
    }

    #[test]
    fn test_category_priority_order() {
        let vocab = Vocabulary::default();
        // "鞋跟高度" holds a heel-shape keyword too; size wins by order.
        assert_eq!(vocab.category_for("鞋跟高度"), Category::Size);
        assert_eq!(vocab.category_for("鞋跟款式"), Category::HeelShape);
        assert_eq!(vocab.category_for("上市年份季节"), Category::Season);
        assert_eq!(vocab.category_for("鞋面材质"), Category::Material);
        assert_eq!(vocab.category_for("闭合方式"), Category::Closure);
        assert_eq!(vocab.category_for("产地"), Category::General);
    }

    #[test]
    fn test_value_map_declared_order() {
        let vocab = Vocabulary::default();
        let entry = vocab.value_entries("材质").unwrap();
        assert_eq!(entry.values[0].value, "真皮");
        assert!(entry.values[0].triggers.iter().any(|t| t == "牛皮"));
        assert!(vocab.value_entries("产地").is_none());
    }

    #[test]
    fn test_image_extensions() {
        let vocab = Vocabulary::default();
        assert!(vocab.supports_image_extension("JPG"));
        assert!(vocab.supports_image_extension("webp"));
        assert!(!vocab.supports_image_extension("gif"));
    }

    #[test]
    fn test_partial_json_override_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        std::fs::write(
            &path,
            r#"{"release_year_keywords": ["发售年份"], "image_extensions": ["png"]}"#,
        )
        .unwrap();

        let vocab = Vocabulary::from_json_file(&path).unwrap();
        assert_eq!(vocab.release_year_keywords, vec!["发售年份"]);
        assert!(!vocab.supports_image_extension("jpg"));
        // Untouched tables keep the built-in data.
        assert!(vocab.canonicalize("帮面材质").is_some());
    }
}
