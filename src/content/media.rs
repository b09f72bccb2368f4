//! Media reference rewriting on rendered HTML.
//!
//! Image sources written as `media/...` are relative to the content
//! unit; published HTML needs them anchored at the site's media path
//! for that post. The rewrite walks the markup as an event stream so
//! that `media/` occurring in text or non-`src` attributes is left
//! alone.

use quick_xml::{
    Reader, Writer,
    events::{BytesStart, Event},
};
use std::borrow::Cow;
use std::io::Cursor;

/// Leading path segment that marks a unit-relative media reference.
const MEDIA_PREFIX: &str = "media/";

/// Rewrite every `<img src="media/...">` so the `media/` segment
/// becomes `media_root` (e.g. `/posts/my-post/media/`).
///
/// Only the leading segment of an `src` attribute on an `img` element
/// is touched. Returns the rewritten document.
pub fn rewrite_media_sources(html: &str, media_root: &str) -> Result<String, quick_xml::Error> {
    let mut reader = create_html_reader(html.as_bytes());
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(html.len())));

    loop {
        match reader.read_event()? {
            Event::Start(elem) if elem.name().as_ref() == b"img" => {
                writer.write_event(Event::Start(rewrite_img(&elem, media_root)))?;
            }
            Event::Empty(elem) if elem.name().as_ref() == b"img" => {
                writer.write_event(Event::Empty(rewrite_img(&elem, media_root)))?;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    Ok(String::from_utf8_lossy(&writer.into_inner().into_inner()).into_owned())
}

/// HTML-tolerant reader: rendered markdown is not strict XML.
fn create_html_reader(content: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

/// Rebuild an `img` element, replacing the leading `media/` segment of
/// its `src` attribute.
fn rewrite_img(elem: &BytesStart<'_>, media_root: &str) -> BytesStart<'static> {
    rebuild_elem(elem, |key, value| {
        if key == b"src"
            && let Some(rest) = value.strip_prefix(MEDIA_PREFIX.as_bytes())
        {
            let mut src = media_root.as_bytes().to_vec();
            src.extend_from_slice(rest);
            return src.into();
        }
        value.into_owned().into()
    })
}

/// Rebuild an element with transformed attributes.
fn rebuild_elem<F>(elem: &BytesStart<'_>, mut transform: F) -> BytesStart<'static>
where
    F: FnMut(&[u8], Cow<'_, [u8]>) -> Cow<'static, [u8]>,
{
    let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let attrs: Vec<_> = elem
        .attributes()
        .flatten()
        .map(|attr| {
            let key = attr.key.as_ref().to_vec();
            let value = transform(attr.key.as_ref(), attr.value);
            (key, value)
        })
        .collect();

    let mut new_elem = BytesStart::new(tag);
    for (k, v) in attrs {
        new_elem.push_attribute((k.as_slice(), v.as_ref()));
    }
    new_elem
}
