//! Sitemap XML parsing
//!
//! Recognises the two document shapes of the sitemaps.org protocol:
//!
//! ```xml
//! <urlset><url><loc>…</loc></url>…</urlset>
//! <sitemapindex><sitemap><loc>…</loc></sitemap>…</sitemapindex>
//! ```
//!
//! Element names are matched on their local part, so prefixed namespaces
//! (`<sm:urlset>`) are accepted.

use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Page URLs, in document order. Entries without a `loc` are dropped.
    UrlSet(Vec<String>),

    /// One slot per `<sitemap>` entry, in document order; `None` when the
    /// entry carries no usable `loc`
    SitemapIndex(Vec<Option<String>>),

    /// Well-formed XML whose root is neither `urlset` nor `sitemapindex`
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    UrlSet,
    SitemapIndex,
    Other,
}

impl Root {
    /// Name of the entry element whose `loc` children count for this root
    fn entry_name(self) -> Option<&'static [u8]> {
        match self {
            Root::UrlSet => Some(b"url"),
            Root::SitemapIndex => Some(b"sitemap"),
            Root::Other => None,
        }
    }
}

/// Parses a sitemap document
///
/// Only `loc` elements that are direct children of an entry element
/// (`url` under `urlset`, `sitemap` under `sitemapindex`) are collected,
/// and only the first non-empty one per entry. Values are whitespace-trimmed
/// and entity-unescaped.
///
/// # Returns
///
/// * `Ok(SitemapDocument)` - The document shape and its entries
/// * `Err(String)` - The XML is malformed or empty
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut root: Option<Root> = None;
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut current_loc: Option<String> = None;
    let mut entries: Vec<Option<String>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if root.is_none() {
                    root = Some(match name.as_slice() {
                        b"urlset" => Root::UrlSet,
                        b"sitemapindex" => Root::SitemapIndex,
                        _ => Root::Other,
                    });
                }
                path.push(name);
                if is_entry(root, &path) {
                    entries.push(None);
                } else if is_entry_loc(root, &path) {
                    current_loc = Some(String::new());
                }
            }
            Ok(Event::Empty(e)) => {
                if root.is_none() {
                    // Self-closing root: <urlset/>
                    root = Some(match e.local_name().as_ref() {
                        b"urlset" => Root::UrlSet,
                        b"sitemapindex" => Root::SitemapIndex,
                        _ => Root::Other,
                    });
                } else {
                    // Self-closing entry: <sitemap/>
                    path.push(e.local_name().as_ref().to_vec());
                    if is_entry(root, &path) {
                        entries.push(None);
                    }
                    path.pop();
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(loc) = current_loc.as_mut() {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    loc.push_str(&text);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                if is_entry_loc(root, &path) {
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if let Some(slot) = entries.last_mut() {
                            if slot.is_none() && !loc.is_empty() {
                                *slot = Some(loc.to_string());
                            }
                        }
                    }
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
            _ => {}
        }
    }

    if !path.is_empty() {
        return Err("unexpected end of document".to_string());
    }

    match root {
        Some(Root::UrlSet) => Ok(SitemapDocument::UrlSet(
            entries.into_iter().flatten().collect(),
        )),
        Some(Root::SitemapIndex) => Ok(SitemapDocument::SitemapIndex(entries)),
        Some(Root::Other) => Ok(SitemapDocument::Unrecognized),
        None => Err("document has no root element".to_string()),
    }
}

/// True when `path` is `<root>/<entry>`
fn is_entry(root: Option<Root>, path: &[Vec<u8>]) -> bool {
    let Some(entry) = root.and_then(Root::entry_name) else {
        return false;
    };
    path.len() == 2 && path[1].as_slice() == entry
}

/// True when `path` is `<root>/<entry>/loc`
fn is_entry_loc(root: Option<Root>, path: &[Vec<u8>]) -> bool {
    let Some(entry) = root.and_then(Root::entry_name) else {
        return false;
    };
    path.len() == 3 && path[1].as_slice() == entry && path[2].as_slice() == b"loc"
}
