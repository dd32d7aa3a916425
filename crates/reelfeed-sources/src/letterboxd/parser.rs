use crate::error::SourceError;
use quick_xml::events::Event;
use quick_xml::Reader;
use reelfeed_models::RawFeedItem;
use tracing::debug;

/// Elements of an `<item>` that we keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Title,
    Description,
    PubDate,
    Link,
    FilmTitle,
    FilmYear,
    MemberRating,
    WatchedDate,
}

impl ItemField {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"description" => Some(Self::Description),
            b"pubDate" => Some(Self::PubDate),
            b"link" => Some(Self::Link),
            b"letterboxd:filmTitle" => Some(Self::FilmTitle),
            b"letterboxd:filmYear" => Some(Self::FilmYear),
            b"letterboxd:memberRating" => Some(Self::MemberRating),
            b"letterboxd:watchedDate" => Some(Self::WatchedDate),
            _ => None,
        }
    }

    fn assign(self, item: &mut RawFeedItem, value: String) {
        let slot = match self {
            Self::Title => &mut item.title,
            Self::Description => &mut item.description,
            Self::PubDate => &mut item.pub_date,
            Self::Link => &mut item.link,
            Self::FilmTitle => &mut item.film_title,
            Self::FilmYear => &mut item.film_year,
            Self::MemberRating => &mut item.member_rating,
            Self::WatchedDate => &mut item.watched_date,
        };
        // First occurrence wins
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

/// Parse a Letterboxd RSS document into its items, in feed order.
///
/// Missing optional elements are left as `None`. The whole document fails
/// when the XML is malformed, when it contains no `<rss>`/`<channel>` element,
/// or when it ends in the middle of an item.
pub fn parse_feed(xml: &str) -> Result<Vec<RawFeedItem>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut saw_feed_root = false;
    let mut current: Option<RawFeedItem> = None;
    // Field being read plus its accumulated text
    let mut field: Option<(ItemField, String)> = None;
    // Elements opened inside the current field (markup inside a description)
    let mut nested = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let qname = e.name();
                let name = qname.as_ref();
                if name == b"rss" || name == b"channel" {
                    saw_feed_root = true;
                }
                if field.is_some() {
                    nested += 1;
                    continue;
                }
                if name == b"item" {
                    current = Some(RawFeedItem::default());
                    continue;
                }
                if current.is_some() {
                    if let Some(f) = ItemField::from_tag(name) {
                        field = Some((f, String::new()));
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if field.is_some() {
                    continue;
                }
                if let (Some(item), Some(f)) = (current.as_mut(), ItemField::from_tag(e.name().as_ref())) {
                    f.assign(item, String::new());
                }
            }
            Ok(Event::End(e)) => {
                if field.is_some() {
                    if nested > 0 {
                        nested -= 1;
                        continue;
                    }
                    if let (Some((f, text)), Some(item)) = (field.take(), current.as_mut()) {
                        f.assign(item, text);
                    }
                    continue;
                }
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some((_, buf)) = field.as_mut() {
                    match e.unescape() {
                        Ok(text) => buf.push_str(&text),
                        // Unknown entities: keep the raw text rather than drop it
                        Err(_) => buf.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some((_, buf)) = field.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(source) => {
                return Err(SourceError::Xml {
                    position: reader.buffer_position() as u64,
                    source,
                });
            }
            _ => {}
        }
    }

    if current.is_some() {
        return Err(SourceError::InvalidFeed("document ended inside an <item>".to_string()));
    }
    if !saw_feed_root {
        return Err(SourceError::InvalidFeed("no <rss> or <channel> element found".to_string()));
    }

    debug!(items = items.len(), "Parsed feed");
    Ok(items)
}

#[cfg(test)]
mod tests;
