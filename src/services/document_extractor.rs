//! PDF 题目提取 - 业务能力层
//!
//! 逐页提取文本，每个非空行就是一道题，难度固定为默认值。
//!
//! lopdf 的 `extract_text` 只在文本对象结束（`ET`）时换行，
//! 同一个 `BT…ET` 内的换行移动（`Td`/`TD`/`T*`/`'`/`"`/`Tm`）会被拼成一行。
//! 所以先把每页内容流按换行移动拆成多个文本对象，再交给 `extract_text`。

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::models::{RawCandidate, UploadFormat};

/// PDF 提取器
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 提取所有候选题目，顺序为：页码顺序，页内行顺序
    pub fn extract(&self, bytes: &[u8]) -> Result<Vec<RawCandidate>, IngestError> {
        let pages = self.extract_pages(bytes)?;
        Ok(split_pages(pages))
    }

    /// 按页码顺序返回每页文本，无法提取文本的页为 `None`
    ///
    /// 只有容器本身打不开才返回错误；单页提取失败只记录警告。
    pub fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<Option<String>>, IngestError> {
        let mut doc = Document::load_mem(bytes).map_err(|e| {
            IngestError::parse(UploadFormat::DocumentText, format!("无法打开 PDF: {}", e))
        })?;

        // get_pages 返回 BTreeMap，按页码升序
        let pages = doc.get_pages();
        debug!("PDF 共 {} 页", pages.len());

        let mut texts = Vec::with_capacity(pages.len());
        for (&page_number, &page_id) in &pages {
            match page_text(&mut doc, page_number, page_id) {
                Ok(text) if !text.trim().is_empty() => texts.push(Some(text)),
                Ok(_) => {
                    debug!("第 {} 页没有可提取的文本，跳过", page_number);
                    texts.push(None);
                }
                Err(e) => {
                    warn!("⚠️ 第 {} 页文本提取失败，跳过: {}", page_number, e);
                    texts.push(None);
                }
            }
        }

        Ok(texts)
    }
}

/// 提取单页文本，每个视觉行以换行结尾
fn page_text(
    doc: &mut Document,
    page_number: u32,
    page_id: ObjectId,
) -> Result<String, lopdf::Error> {
    let data = page_content(doc, page_id)?;
    if data.is_empty() {
        return Ok(String::new());
    }

    let content = break_text_lines(Content::decode(&data)?);
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", stream_id);

    doc.extract_text(&[page_number])
}

/// 读出页面的全部内容流
///
/// `Contents` 引用了不存在的对象或非流对象时返回错误；没有 `Contents` 的页为空。
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, lopdf::Error> {
    let page = doc.get_object(page_id)?.as_dict()?;
    let entries: Vec<&Object> = match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.iter().collect(),
        Ok(entry) => vec![entry],
        Err(_) => return Ok(Vec::new()),
    };

    let mut data = Vec::new();
    for entry in entries {
        let stream = doc.get_object(entry.as_reference()?)?.as_stream()?;
        match stream.decompressed_content() {
            Ok(plain) => data.extend_from_slice(&plain),
            Err(_) => data.extend_from_slice(&stream.content),
        }
        data.push(b'\n');
    }
    Ok(data)
}

/// 在文本对象内部的每次换行处插入 `ET` / `BT`
///
/// `'` 和 `"` 被改写为 `T*` + `Tj`，文字本身不变；字体状态不受 `BT` 影响。
fn break_text_lines(content: Content) -> Content {
    let mut operations = Vec::with_capacity(content.operations.len());
    let mut in_text = false;
    // 当前行是否已经输出过文字
    let mut shown = false;
    let mut line_y: Option<f64> = None;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                shown = false;
                line_y = None;
                operations.push(op);
            }
            "ET" => {
                in_text = false;
                operations.push(op);
            }
            "Tj" | "TJ" => {
                shown = true;
                operations.push(op);
            }
            "Td" | "TD" if in_text => {
                let moves_down = operand_number(&op.operands, 1)
                    .is_some_and(|ty| ty.abs() > f64::EPSILON);
                if shown && moves_down {
                    push_line_break(&mut operations);
                    shown = false;
                }
                operations.push(op);
            }
            "T*" if in_text => {
                if shown {
                    push_line_break(&mut operations);
                    shown = false;
                }
                operations.push(op);
            }
            "Tm" if in_text => {
                let y = operand_number(&op.operands, 5);
                let same_line = matches!(
                    (line_y, y),
                    (Some(a), Some(b)) if (a - b).abs() <= f64::EPSILON
                );
                if shown && !same_line {
                    push_line_break(&mut operations);
                    shown = false;
                }
                line_y = y;
                operations.push(op);
            }
            "'" if in_text => {
                if shown {
                    push_line_break(&mut operations);
                }
                operations.push(Operation::new("T*", vec![]));
                operations.push(Operation::new("Tj", op.operands));
                shown = true;
            }
            "\"" if in_text => {
                if shown {
                    push_line_break(&mut operations);
                }
                let mut operands = op.operands;
                let text = operands.pop();
                if let [word_spacing, char_spacing] = operands.as_slice() {
                    operations.push(Operation::new("Tw", vec![word_spacing.clone()]));
                    operations.push(Operation::new("Tc", vec![char_spacing.clone()]));
                }
                operations.push(Operation::new("T*", vec![]));
                operations.push(Operation::new("Tj", text.into_iter().collect()));
                shown = true;
            }
            _ => operations.push(op),
        }
    }

    Content { operations }
}

fn push_line_break(operations: &mut Vec<Operation>) {
    operations.push(Operation::new("ET", vec![]));
    operations.push(Operation::new("BT", vec![]));
}

fn operand_number(operands: &[Object], index: usize) -> Option<f64> {
    match operands.get(index)? {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// 把逐页文本拆成行级候选
pub fn split_pages<I>(pages: I) -> Vec<RawCandidate>
where
    I: IntoIterator<Item = Option<String>>,
{
    pages
        .into_iter()
        .flatten()
        .flat_map(|text| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(RawCandidate::without_difficulty)
                .collect::<Vec<_>>()
        })
        .collect()
}
