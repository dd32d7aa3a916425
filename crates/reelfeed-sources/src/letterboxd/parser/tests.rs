use super::*;

const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:letterboxd="https://letterboxd.com" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Letterboxd - someone</title>
    <link>https://letterboxd.com/someone/</link>
    <item>
      <title>Perfect Blue, 1997 - ★★★★</title>
      <link>https://letterboxd.com/someone/film/perfect-blue/</link>
      <pubDate>Sun, 12 May 2024 14:03:11 +1200</pubDate>
      <letterboxd:watchedDate>2024-05-11</letterboxd:watchedDate>
      <letterboxd:filmTitle>Perfect Blue</letterboxd:filmTitle>
      <letterboxd:filmYear>1997</letterboxd:filmYear>
      <letterboxd:memberRating>4.0</letterboxd:memberRating>
      <description><![CDATA[ <p><img src="https://a.ltrbxd.com/poster.jpg"/></p> <p>Mima &amp; the <em>mirror</em>.</p> ]]></description>
    </item>
    <item>
      <title>Oldboy, 2003 - ★★★★½</title>
      <link>https://letterboxd.com/someone/film/oldboy/</link>
      <pubDate>Sat, 11 May 2024 09:00:00 +0000</pubDate>
      <description>&lt;p&gt;Hallway fight.&lt;/p&gt;</description>
    </item>
    <item>
      <title>No description here</title>
      <letterboxd:memberRating/>
    </item>
  </channel>
</rss>"#;

#[test]
fn test_parse_feed_preserves_order() {
    let items = parse_feed(FEED).unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].film_title.as_deref(), Some("Perfect Blue"));
    assert_eq!(items[1].title.as_deref(), Some("Oldboy, 2003 - ★★★★½"));
    assert_eq!(items[2].title.as_deref(), Some("No description here"));
}

#[test]
fn test_parse_feed_custom_fields() {
    let items = parse_feed(FEED).unwrap();
    let item = &items[0];
    assert_eq!(item.film_year.as_deref(), Some("1997"));
    assert_eq!(item.member_rating.as_deref(), Some("4.0"));
    assert_eq!(item.watched_date.as_deref(), Some("2024-05-11"));
    assert_eq!(item.link.as_deref(), Some("https://letterboxd.com/someone/film/perfect-blue/"));
    assert_eq!(item.film_fields(), Some(("Perfect Blue", "1997")));
    assert!(item.description.is_some());
}

#[test]
fn test_parse_feed_cdata_description_is_raw_html() {
    let items = parse_feed(FEED).unwrap();
    let description = items[0].description.as_deref().unwrap();
    assert!(description.contains(r#"<img src="https://a.ltrbxd.com/poster.jpg"/>"#));
    // Entities inside CDATA are left for the text normalizer
    assert!(description.contains("Mima &amp; the <em>mirror</em>."));
}

#[test]
fn test_parse_feed_escaped_description_is_unescaped() {
    let items = parse_feed(FEED).unwrap();
    assert_eq!(items[1].description.as_deref(), Some("<p>Hallway fight.</p>"));
    assert_eq!(items[1].film_fields(), None);
    assert_eq!(items[1].film_title, None);
    assert_eq!(items[1].member_rating, None);
}

#[test]
fn test_parse_feed_missing_and_empty_fields() {
    let items = parse_feed(FEED).unwrap();
    let item = &items[2];
    assert_eq!(item.description, None);
    assert!(item.title.is_some());
    // An empty element is present but blank
    assert_eq!(item.member_rating.as_deref(), Some(""));
}

#[test]
fn test_channel_title_is_not_an_item_field() {
    let items = parse_feed(FEED).unwrap();
    assert!(items.iter().all(|i| i.title.as_deref() != Some("Letterboxd - someone")));
}

#[test]
fn test_parse_feed_empty_channel() {
    let items = parse_feed("<rss><channel><title>x</title></channel></rss>").unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_parse_feed_mismatched_tags_is_error() {
    let result = parse_feed("<rss><channel><item><title>x</title></channel></rss>");
    assert!(matches!(result, Err(SourceError::Xml { .. })));
}

#[test]
fn test_parse_feed_without_rss_root_is_error() {
    let result = parse_feed("just some text");
    assert!(matches!(result, Err(SourceError::InvalidFeed(_))));
}

#[test]
fn test_parse_feed_truncated_item_is_error() {
    let result = parse_feed("<rss><channel><item><title>x</title>");
    assert!(result.is_err());
}
