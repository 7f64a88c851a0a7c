use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// 提取服务
///
/// 负责按CSS选择器从 HTML 内容中提取可见文本
pub struct ExtractionService;

impl ExtractionService {
    /// 提取文本
    ///
    /// 按选择器顺序处理所有匹配元素：去掉 `script`/`style` 子树中的文本，
    /// 把连续空白压缩成单个空格，非空结果各占一行。无效选择器被跳过。
    pub fn extract_text(html_content: &str, selectors: &[String]) -> String {
        let document = Html::parse_document(html_content);
        let mut lines = Vec::new();

        for selector_str in selectors {
            let selector = match Selector::parse(selector_str) {
                Ok(s) => s,
                Err(e) => {
                    warn!(selector = %selector_str, error = ?e, "Skipping invalid selector");
                    continue;
                }
            };

            for element in document.select(&selector) {
                let text = visible_text(element);
                if !text.is_empty() {
                    lines.push(text);
                }
            }
        }

        lines.join("\n")
    }
}

/// 元素内可见文本，空白已规范化
fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != element.id())
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| matches!(el.name(), "script" | "style"))
            });

        if !hidden {
            raw.push_str(text);
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
