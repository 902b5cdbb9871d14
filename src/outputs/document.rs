//! Document edit requests, the offset cursor, and an in-memory document.
//!
//! Offsets are 1-based (index 1 is just after the document start) and
//! counted in UTF-16 code units, the unit the remote document API uses.
//! Inserting `n` units at index `k` shifts everything at or after `k` by
//! `n`, so a writer appending in order advances its cursor by exactly the
//! length of each inserted text.

use crate::error::ExportError;
use crate::utils::utf16_len;
use serde::Serialize;
use std::fmt::Write;
use std::ops::Range;

/// First insertable index of an empty document.
pub const DOCUMENT_START: usize = 1;

/// One edit, serialized in the remote API's `batchUpdate` request shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocRequest {
    InsertText(InsertText),
    UpdateTextStyle(UpdateTextStyle),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertText {
    pub text: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyle {
    pub range: TextRange,
    pub text_style: TextStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_index: usize,
    pub end_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub link: Link,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
}

impl DocRequest {
    pub fn insert(index: usize, text: &str) -> Self {
        DocRequest::InsertText(InsertText {
            text: text.to_string(),
            location: Location { index },
        })
    }

    pub fn link(range: Range<usize>, url: &str) -> Self {
        DocRequest::UpdateTextStyle(UpdateTextStyle {
            range: TextRange {
                start_index: range.start,
                end_index: range.end,
            },
            text_style: TextStyle {
                link: Link { url: url.to_string() },
            },
            fields: "link".to_string(),
        })
    }
}

/// Running insertion point. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    offset: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            offset: DOCUMENT_START,
        }
    }
}

impl Cursor {
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Queue an insertion of `text` at the cursor and advance past it.
    ///
    /// Returns the index range the text occupies once applied.
    pub fn insert(&mut self, batch: &mut Vec<DocRequest>, text: &str) -> Range<usize> {
        let start = self.offset;
        batch.push(DocRequest::insert(start, text));
        self.offset += utf16_len(text);
        start..self.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LinkSpan {
    range: Range<usize>,
    url: String,
}

/// A plain-text document with hyperlinked ranges, edited through [`DocRequest`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    text: String,
    links: Vec<LinkSpan>,
}

impl Document {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            text: String::new(),
            links: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// One past the last index holding content.
    pub fn end_index(&self) -> usize {
        DOCUMENT_START + utf16_len(&self.text)
    }

    /// `(text, url)` for every linked range, in document order.
    #[cfg(test)]
    pub fn links(&self) -> Vec<(String, String)> {
        let mut spans = self.links.clone();
        spans.sort_by_key(|s| s.range.start);
        spans
            .into_iter()
            .filter_map(|s| {
                let start = self.byte_at(s.range.start)?;
                let end = self.byte_at(s.range.end)?;
                Some((self.text[start..end].to_string(), s.url))
            })
            .collect()
    }

    /// Apply a whole batch, all or nothing.
    pub fn apply_batch(&mut self, requests: &[DocRequest]) -> Result<(), ExportError> {
        let mut next = self.clone();
        for request in requests {
            next.apply(request)?;
        }
        *self = next;
        Ok(())
    }

    pub fn apply(&mut self, request: &DocRequest) -> Result<(), ExportError> {
        match request {
            DocRequest::InsertText(InsertText { text, location }) => {
                self.insert_text(location.index, text)
            }
            DocRequest::UpdateTextStyle(UpdateTextStyle {
                range, text_style, ..
            }) => self.link_range(
                range.start_index..range.end_index,
                &text_style.link.url,
            ),
        }
    }

    fn insert_text(&mut self, index: usize, text: &str) -> Result<(), ExportError> {
        let at = self.byte_at(index).ok_or_else(|| {
            ExportError::Backend(format!(
                "insert index {index} outside document (end index {})",
                self.end_index()
            ))
        })?;
        self.text.insert_str(at, text);

        let shift = utf16_len(text);
        for span in &mut self.links {
            if span.range.start >= index {
                span.range.start += shift;
                span.range.end += shift;
            } else if span.range.end > index {
                span.range.end += shift;
            }
        }
        Ok(())
    }

    fn link_range(&mut self, range: Range<usize>, url: &str) -> Result<(), ExportError> {
        if range.start >= range.end
            || self.byte_at(range.start).is_none()
            || self.byte_at(range.end).is_none()
        {
            return Err(ExportError::Backend(format!(
                "style range {}..{} invalid (end index {})",
                range.start,
                range.end,
                self.end_index()
            )));
        }
        self.links.retain(|s| s.range.end <= range.start || s.range.start >= range.end);
        self.links.push(LinkSpan {
            range,
            url: url.to_string(),
        });
        Ok(())
    }

    /// Byte offset of document `index`, if it lies on a character boundary.
    fn byte_at(&self, index: usize) -> Option<usize> {
        let mut units = index.checked_sub(DOCUMENT_START)?;
        for (byte, ch) in self.text.char_indices() {
            if units == 0 {
                return Some(byte);
            }
            units = units.checked_sub(ch.len_utf16())?;
        }
        (units == 0).then_some(self.text.len())
    }

    /// Markdown rendering: the title as a heading, linked ranges as `[text](url)`.
    pub fn to_markdown(&self) -> String {
        let mut spans = self.links.clone();
        spans.sort_by_key(|s| s.range.start);
        let mut spans = spans.into_iter().peekable();

        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", self.title);

        let mut index = DOCUMENT_START;
        let mut open: Option<LinkSpan> = None;
        for ch in self.text.chars() {
            if open.as_ref().is_some_and(|s| s.range.end == index) {
                if let Some(span) = open.take() {
                    let _ = write!(out, "]({})", span.url);
                }
            }
            if open.is_none() && spans.peek().is_some_and(|s| s.range.start == index) {
                out.push('[');
                open = spans.next();
            }
            out.push(ch);
            index += ch.len_utf16();
        }
        if let Some(span) = open {
            let _ = write!(out, "]({})", span.url);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_serialize_to_batch_update_shape() {
        let insert = serde_json::to_value(DocRequest::insert(5, "hi")).unwrap();
        assert_eq!(
            insert,
            serde_json::json!({"insertText": {"text": "hi", "location": {"index": 5}}})
        );

        let link = serde_json::to_value(DocRequest::link(3..9, "https://x.com")).unwrap();
        assert_eq!(
            link,
            serde_json::json!({"updateTextStyle": {
                "range": {"startIndex": 3, "endIndex": 9},
                "textStyle": {"link": {"url": "https://x.com"}},
                "fields": "link"
            }})
        );
    }

    #[test]
    fn test_cursor_advances_by_inserted_length() {
        let texts = ["News Monitoring Report\n", "Generated: now\n", "बजट\n", "📰 x\n"];
        let mut cursor = Cursor::default();
        let mut batch = Vec::new();
        for t in texts {
            cursor.insert(&mut batch, t);
        }
        let expected = 1 + texts.iter().map(|t| t.encode_utf16().count()).sum::<usize>();
        assert_eq!(cursor.offset(), expected);
        assert_eq!(batch.len(), 4);
        assert_eq!(batch[1], DocRequest::insert(24, "Generated: now\n"));
    }

    #[test]
    fn test_sequential_inserts_build_text_in_order() {
        let mut cursor = Cursor::default();
        let mut batch = Vec::new();
        cursor.insert(&mut batch, "Read More: ");
        let range = cursor.insert(&mut batch, "https://x.com/a");
        batch.push(DocRequest::link(range, "https://x.com/a"));
        cursor.insert(&mut batch, "\n");

        let mut doc = Document::new("Report");
        doc.apply_batch(&batch).unwrap();
        assert_eq!(doc.text(), "Read More: https://x.com/a\n");
        assert_eq!(doc.end_index(), cursor.offset());
        assert_eq!(
            doc.links(),
            vec![("https://x.com/a".to_string(), "https://x.com/a".to_string())]
        );
        assert_eq!(
            doc.to_markdown(),
            "# Report\n\nRead More: [https://x.com/a](https://x.com/a)\n"
        );
    }

    #[test]
    fn test_insert_before_link_shifts_it() {
        let mut doc = Document::new("t");
        doc.apply(&DocRequest::insert(1, "abc")).unwrap();
        doc.apply(&DocRequest::link(2..3, "u")).unwrap();
        doc.apply(&DocRequest::insert(1, "XY")).unwrap();
        assert_eq!(doc.text(), "XYabc");
        assert_eq!(doc.links(), vec![("b".to_string(), "u".to_string())]);
    }

    #[test]
    fn test_out_of_range_insert_is_rejected() {
        let mut doc = Document::new("t");
        assert!(doc.apply(&DocRequest::insert(0, "x")).is_err());
        assert!(doc.apply(&DocRequest::insert(2, "x")).is_err());
        doc.apply(&DocRequest::insert(1, "📰")).unwrap();
        // Index 2 would split the surrogate pair.
        assert!(doc.apply(&DocRequest::insert(2, "x")).is_err());
        doc.apply(&DocRequest::insert(3, "x")).unwrap();
        assert_eq!(doc.text(), "📰x");
    }

    #[test]
    fn test_failed_batch_leaves_document_unchanged() {
        let mut doc = Document::new("t");
        doc.apply(&DocRequest::insert(1, "keep")).unwrap();
        let batch = vec![DocRequest::insert(5, " more"), DocRequest::insert(99, "bad")];
        assert!(doc.apply_batch(&batch).is_err());
        assert_eq!(doc.text(), "keep");
    }

    #[test]
    fn test_invalid_style_range_is_rejected() {
        let mut doc = Document::new("t");
        doc.apply(&DocRequest::insert(1, "abc")).unwrap();
        assert!(doc.apply(&DocRequest::link(2..2, "u")).is_err());
        assert!(doc.apply(&DocRequest::link(2..9, "u")).is_err());
    }
}
