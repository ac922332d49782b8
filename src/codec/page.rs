//! A page's raw markdown split into frontmatter, outline body and backlinks region.

use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;

use crate::{
    codec::outline,
    error::NotazaError,
    properties::{Block, PageId},
};

pub const BACKLINKS_START: &str = "<!-- notaza backlinks start -->";
pub const BACKLINKS_END: &str = "<!-- notaza backlinks end -->";

const FRONTMATTER_FENCE: &str = "---";

/// Raw text of a page, cut into its three regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSections<'a> {
    /// The full frontmatter block including both fences and the trailing newline.
    pub frontmatter: Option<&'a str>,
    pub body: String,
    /// The backlinks region from the start sentinel through the end sentinel.
    pub backlinks: Option<&'a str>,
}

/// Byte length of a leading `---\n...\n---\n` block, if `raw` starts with one.
fn frontmatter_len(raw: &str) -> Option<usize> {
    let mut lines = raw.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != FRONTMATTER_FENCE {
        return None;
    }
    let mut len = first.len();
    for line in lines {
        len += line.len();
        if line.trim_end() == FRONTMATTER_FENCE {
            return Some(len);
        }
    }
    None
}

/// Byte offset of the unindented line equal to `sentinel`, searching from `from`.
fn find_sentinel_line(raw: &str, sentinel: &str, from: usize) -> Option<(usize, usize)> {
    let mut offset = from;
    for line in raw[from..].split_inclusive('\n') {
        if line.trim_end() == sentinel {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

impl<'a> RawSections<'a> {
    pub fn split(raw: &'a str) -> RawSections<'a> {
        let fm_len = frontmatter_len(raw).unwrap_or(0);
        let frontmatter = (fm_len > 0).then(|| &raw[..fm_len]);
        let Some((region_start, start_line_end)) = find_sentinel_line(raw, BACKLINKS_START, fm_len)
        else {
            return RawSections {
                frontmatter,
                body: raw[fm_len..].to_string(),
                backlinks: None,
            };
        };
        let region_end = match find_sentinel_line(raw, BACKLINKS_END, start_line_end) {
            Some((_, end)) => end,
            None => {
                tracing::warn!("Backlinks start sentinel without end sentinel; region runs to end of page");
                raw.len()
            }
        };
        let mut body = raw[fm_len..region_start].to_string();
        let trailer = &raw[region_end..];
        if !trailer.trim().is_empty() {
            if !body.ends_with('\n') {
                body.push('\n');
            }
            body.push_str(trailer);
        }
        RawSections {
            frontmatter,
            body,
            backlinks: Some(raw[region_start..region_end].trim_end()),
        }
    }
}

fn yaml_scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Null => Some(String::new()),
        _ => None,
    }
}

/// Parse the inside of a frontmatter block (fences included or not) into a string mapping.
/// Non-scalar values are skipped.
pub fn parse_frontmatter(block: &str) -> Result<BTreeMap<String, String>, NotazaError> {
    let inner: String = block
        .lines()
        .filter(|line| line.trim_end() != FRONTMATTER_FENCE)
        .collect::<Vec<&str>>()
        .join("\n");
    if inner.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let mapping: BTreeMap<String, YamlValue> = serde_yaml::from_str(&inner)?;
    Ok(mapping
        .iter()
        .filter_map(|(key, value)| yaml_scalar_to_string(value).map(|v| (key.clone(), v)))
        .collect())
}

/// One page of the notebook.
///
/// `raw` is the authoritative on-disk form; `body` is derived from it. A page whose body does not
/// parse carries a single explanatory block and the error in `parse_error`, so that one broken
/// file never stops the rest of the notebook from loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub front_matter: BTreeMap<String, String>,
    pub body: Block,
    pub raw: String,
    /// Verbatim frontmatter block, re-emitted unchanged.
    pub front_matter_raw: Option<String>,
    /// Verbatim backlinks region as last generated.
    pub backlinks_raw: Option<String>,
    pub parse_error: Option<NotazaError>,
}

impl Page {
    /// A page that does not exist yet.
    pub fn empty(id: PageId) -> Page {
        Page {
            title: id.to_string(),
            id,
            front_matter: BTreeMap::new(),
            body: Block::root(),
            raw: String::new(),
            front_matter_raw: None,
            backlinks_raw: None,
            parse_error: None,
        }
    }

    #[tracing::instrument(skip_all, fields(page = %id))]
    pub fn parse(id: PageId, raw: &str) -> Page {
        let sections = RawSections::split(raw);
        let front_matter = match sections.frontmatter {
            Some(block) => parse_frontmatter(block).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unparsable frontmatter: {e}");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        let title = front_matter
            .get("title")
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| id.to_string());
        let (body, parse_error) = match outline::parse(&sections.body) {
            Ok(body) => (body, None),
            Err(e) => {
                tracing::warn!("Page could not be parsed: {e}");
                let mut root = Block::root();
                root.children
                    .push(Block::new(format!("Page could not be parsed: {e}")));
                (root, Some(e))
            }
        };
        Page {
            id,
            title,
            front_matter,
            body,
            raw: raw.to_string(),
            front_matter_raw: sections.frontmatter.map(str::to_string),
            backlinks_raw: sections.backlinks.map(str::to_string),
            parse_error,
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.parse_error.is_some()
    }

    /// Reassemble `frontmatter + body + backlinks region`, trimmed to a single trailing newline.
    pub fn assemble(&self, backlinks: Option<&str>) -> String {
        let mut out = self.front_matter_raw.clone().unwrap_or_default();
        let body = outline::serialize(&self.body);
        // The closing fence must stay on its own line.
        if !out.is_empty() && !out.ends_with('\n') && (!body.is_empty() || backlinks.is_some()) {
            out.push('\n');
        }
        out.push_str(&body);
        if let Some(region) = backlinks {
            if !body.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(region);
        }
        let trimmed_len = out.trim_end().len();
        out.truncate(trimmed_len);
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Raw text for the current body, keeping the existing backlinks region verbatim.
    pub fn render(&self) -> String {
        self.assemble(self.backlinks_raw.as_deref())
    }

    /// Replace the body and refresh `raw` from it.
    pub fn set_body(&mut self, body: Block) {
        self.body = body;
        self.parse_error = None;
        self.raw = self.render();
    }
}
