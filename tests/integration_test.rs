// End-to-end tests for attrx over mocked capabilities.
use async_trait::async_trait;
use attrx_core::capability::{
    CapabilityError, CapabilityResult, ChatModel, FieldSource, FieldValues, VisionModel,
};
use attrx_core::{AttributeRequest, AttributeSelector, ResolutionDate, Vocabulary};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct MockFields {
    record: FieldValues,
    calls: AtomicUsize,
}

impl MockFields {
    fn with(pairs: &[(&str, &str)]) -> Self {
        let mut record = FieldValues::new();
        for (name, value) in pairs {
            record.insert(*name, *value);
        }
        Self {
            record,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FieldSource for MockFields {
    async fn fetch_fields(
        &self,
        _product_id: &str,
        field_names: &[&str],
    ) -> CapabilityResult<FieldValues> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = FieldValues::new();
        for name in field_names {
            if let Some(value) = self.record.get(name) {
                out.insert(*name, value);
            }
        }
        Ok(out)
    }
}

#[derive(Default)]
struct MockChat {
    answer: Option<&'static str>,
    calls: AtomicUsize,
}

impl MockChat {
    fn answering(answer: &'static str) -> Self {
        Self {
            answer: Some(answer),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for MockChat {
    async fn complete(&self, _prompt: &str) -> CapabilityResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Some(answer) => Ok(answer.to_string()),
            None => Err(CapabilityError::ChatModel("offline".to_string())),
        }
    }
}

#[derive(Default)]
struct MockVision {
    answer: Option<&'static str>,
    calls: AtomicUsize,
}

impl MockVision {
    fn answering(answer: &'static str) -> Self {
        Self {
            answer: Some(answer),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for MockVision {
    async fn describe(&self, _image: &Path, _question: &str) -> CapabilityResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Some(answer) => Ok(answer.to_string()),
            None => Err(CapabilityError::VisionModel("offline".to_string())),
        }
    }
}

fn selector(
    fields: Arc<MockFields>,
    chat: Arc<MockChat>,
    vision: Arc<MockVision>,
) -> AttributeSelector {
    AttributeSelector::new(Arc::new(Vocabulary::default()), fields, chat, vision)
}

fn request(attribute: &str, candidates: &[&str], image: Option<PathBuf>) -> AttributeRequest {
    AttributeRequest {
        product_id: "P123".to_string(),
        attribute_name: attribute.to_string(),
        candidates: candidates.iter().map(|s| s.to_string()).collect(),
        image,
    }
}

const APRIL: ResolutionDate = ResolutionDate { year: 2026, month: 4 };

#[tokio::test]
async fn test_season_resolved_from_calendar_alone() {
    let fields = Arc::new(MockFields::default());
    let chat = Arc::new(MockChat::failing());
    let vision = Arc::new(MockVision::default());
    let s = selector(fields.clone(), chat.clone(), vision.clone());

    let req = request("季节", &["春季", "夏季", "秋季", "冬季", "四季"], None);
    let result = s.select_at(&req, APRIL).await;

    // April is spring; a plain season attribute wants the next season.
    assert_eq!(result.product_id, "P123");
    assert_eq!(result.selected_value, "夏季");
    assert_eq!(fields.calls(), 0);
    assert_eq!(chat.calls(), 0);
    assert_eq!(vision.calls(), 0);
}

#[tokio::test]
async fn test_closure_without_image_takes_model_fallback() {
    let fields = Arc::new(MockFields::default());
    let chat = Arc::new(MockChat::answering("拉链"));
    let vision = Arc::new(MockVision::answering("系带"));
    let s = selector(fields.clone(), chat.clone(), vision.clone());

    let req = request("闭合方式", &["系带", "拉链", "套脚"], None);
    let result = s.select_at(&req, APRIL).await;

    // The resolver short-circuits on the missing image; the orchestrator's
    // empty-query fallback asks the chat model instead.
    assert_eq!(result.selected_value, "拉链");
    assert_eq!(vision.calls(), 0);
    assert_eq!(chat.calls(), 1);
}

#[tokio::test]
async fn test_closure_fallback_empty_when_model_fails() {
    let fields = Arc::new(MockFields::default());
    let chat = Arc::new(MockChat::failing());
    let vision = Arc::new(MockVision::default());
    let s = selector(fields, chat.clone(), vision.clone());

    let req = request("闭合方式", &["系带", "拉链", "套脚"], None);
    let result = s.select_at(&req, APRIL).await;

    // Could not determine: the committed policy returns empty, never the
    // first candidate.
    assert_eq!(result.selected_value, "");
    assert_eq!(vision.calls(), 0);
}

#[tokio::test]
async fn test_material_resolved_from_database_without_model() {
    let fields = Arc::new(MockFields::with(&[("鞋面材质", "牛皮革+织物")]));
    let chat = Arc::new(MockChat::failing());
    let vision = Arc::new(MockVision::default());
    let s = selector(fields.clone(), chat.clone(), vision);

    let req = request("帮面材质", &["真皮", "人造革", "织物"], None);
    let result = s.select_at(&req, APRIL).await;

    // Alias 帮面材质 canonicalizes to 鞋面材质, the record's composite
    // material is stripped to 牛皮革, and the value map resolves it.
    assert_eq!(result.selected_value, "真皮");
    assert_eq!(fields.calls(), 1);
    assert_eq!(chat.calls(), 0);
}

#[tokio::test]
async fn test_unknown_attribute_with_no_data_returns_empty() {
    let fields = Arc::new(MockFields::default());
    let chat = Arc::new(MockChat::failing());
    let vision = Arc::new(MockVision::default());
    let s = selector(fields, chat.clone(), vision);

    let req = request("产地", &["广州", "温州"], None);
    let result = s.select_at(&req, APRIL).await;

    assert_eq!(result.selected_value, "");
    // One canonicalization attempt; the failed fallback match adds another.
    assert_eq!(chat.calls(), 2);
}

#[tokio::test]
async fn test_single_candidate_wins_without_any_source() {
    let fields = Arc::new(MockFields::default());
    let chat = Arc::new(MockChat::failing());
    let vision = Arc::new(MockVision::default());
    let s = selector(fields, chat, vision);

    let req = request("鞋面材质", &["真皮"], None);
    let result = s.select_at(&req, APRIL).await;

    assert_eq!(result.selected_value, "真皮");
}

#[tokio::test]
async fn test_empty_candidates_yield_empty_result() {
    let fields = Arc::new(MockFields::default());
    let chat = Arc::new(MockChat::answering("系带"));
    let vision = Arc::new(MockVision::default());
    let s = selector(fields, chat.clone(), vision);

    let req = request("闭合方式", &[], None);
    let result = s.select_at(&req, APRIL).await;

    assert_eq!(result.selected_value, "");
    assert_eq!(chat.calls(), 0);
}

#[tokio::test]
async fn test_unsupported_image_extension_treated_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("shoe.gif");
    std::fs::write(&image, b"gif").unwrap();

    let fields = Arc::new(MockFields::default());
    let chat = Arc::new(MockChat::answering("套脚"));
    let vision = Arc::new(MockVision::answering("系带"));
    let s = selector(fields, chat.clone(), vision.clone());

    let req = request("闭合方式", &["系带", "拉链", "套脚"], Some(image));
    let result = s.select_at(&req, APRIL).await;

    // The .gif never reaches the vision model; the fallback answers.
    assert_eq!(vision.calls(), 0);
    assert_eq!(result.selected_value, "套脚");
}

#[tokio::test]
async fn test_supported_image_reaches_vision_model() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("shoe.jpg");
    std::fs::write(&image, b"jpeg").unwrap();

    let fields = Arc::new(MockFields::default());
    let chat = Arc::new(MockChat::failing());
    let vision = Arc::new(MockVision::answering("系带"));
    let s = selector(fields, chat, vision.clone());

    let req = request("闭合方式", &["系带", "拉链", "套脚"], Some(image));
    let result = s.select_at(&req, APRIL).await;

    assert_eq!(vision.calls(), 1);
    // The chat mock is offline; the embedding fallback maps the exact
    // vision answer onto the matching candidate.
    assert_eq!(result.selected_value, "系带");
}
