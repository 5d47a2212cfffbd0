//! Streaming parser for ELAN `.eaf` XML documents.
//!
//! We read the document in a single pass with `quick-xml`, keeping only the
//! elements the conversion needs (`eaf::EafDocument` describes the subset).
//! Unknown elements and attributes are skipped, so documents produced by
//! newer ELAN versions still parse as long as the core structure holds.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::eaf::{Annotation, EafDocument, MediaDescriptor, Tier, TimeSlot};
use crate::error::{Error, Result};

/// Parse a complete `.eaf` document from its XML text.
pub fn parse_str(xml: &str) -> Result<EafDocument> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut doc = EafDocument::default();
    // The tier currently being read, if any. Annotations are attached here.
    let mut current_tier: Option<Tier> = None;
    // The annotation currently being read; its value arrives via a nested
    // ANNOTATION_VALUE element.
    let mut pending: Option<Annotation> = None;
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"TIER" => {
                    current_tier = Some(tier_from(e)?);
                }
                b"ALIGNABLE_ANNOTATION" => {
                    if current_tier.is_none() {
                        return Err(Error::msg("ALIGNABLE_ANNOTATION outside of a TIER"));
                    }
                    pending = Some(alignable_from(e)?);
                }
                b"REF_ANNOTATION" => {
                    if current_tier.is_none() {
                        return Err(Error::msg("REF_ANNOTATION outside of a TIER"));
                    }
                    pending = Some(ref_from(e)?);
                }
                b"ANNOTATION_VALUE" => {
                    in_value = pending.is_some();
                }
                b"TIME_SLOT" => doc.time_order.push(time_slot_from(e)?),
                b"MEDIA_DESCRIPTOR" => doc.media.push(media_from(e)?),
                _ => {}
            },
            // Elements that carry everything in attributes are usually
            // self-closing, which quick-xml reports as Empty.
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"TIME_SLOT" => doc.time_order.push(time_slot_from(e)?),
                b"MEDIA_DESCRIPTOR" => doc.media.push(media_from(e)?),
                b"TIER" => doc.tiers.push(tier_from(e)?),
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                if in_value {
                    let text = t
                        .decode()
                        .map_err(|err| Error::msg(format!("invalid XML escape: {err}")))?;
                    if let Some(annotation) = pending.as_mut() {
                        push_value(annotation, &text);
                    }
                }
            }
            // quick-xml reports entity and character references (e.g. `&amp;`)
            // as their own events rather than unescaping them inline, so we
            // resolve them back into the annotation value here.
            Ok(Event::GeneralRef(ref r)) => {
                if in_value {
                    let resolved = if let Some(ch) = r
                        .resolve_char_ref()
                        .map_err(|err| Error::msg(format!("invalid XML escape: {err}")))?
                    {
                        ch.to_string()
                    } else {
                        let name = r
                            .decode()
                            .map_err(|err| Error::msg(format!("invalid XML escape: {err}")))?;
                        resolve_predefined_entity(&name)
                            .ok_or_else(|| Error::msg(format!("unknown XML entity: {name}")))?
                            .to_string()
                    };
                    if let Some(annotation) = pending.as_mut() {
                        push_value(annotation, &resolved);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"ANNOTATION_VALUE" => in_value = false,
                b"ALIGNABLE_ANNOTATION" | b"REF_ANNOTATION" => {
                    let annotation = pending
                        .take()
                        .ok_or_else(|| Error::msg("unbalanced annotation element"))?;
                    if let Some(tier) = current_tier.as_mut() {
                        tier.annotations.push(annotation);
                    }
                }
                b"TIER" => {
                    let tier = current_tier
                        .take()
                        .ok_or_else(|| Error::msg("unbalanced TIER element"))?;
                    doc.tiers.push(tier);
                }
                _ => {}
            },
            Ok(Event::Eof) => {
                if current_tier.is_some() || pending.is_some() {
                    return Err(Error::msg("truncated .eaf document: unclosed elements"));
                }
                break;
            }
            Ok(_) => {}
            Err(err) => {
                return Err(Error::msg(format!(
                    "malformed .eaf XML at byte {}: {err}",
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }

    Ok(doc)
}

fn push_value(annotation: &mut Annotation, text: &str) {
    match annotation {
        Annotation::Alignable { value, .. } => value.push_str(text),
        Annotation::Ref { value, .. } => value.push_str(text),
    }
}

/// Collect an element's attributes into owned key/value pairs.
fn attributes(e: &BytesStart) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        map.insert(
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        );
    }
    Ok(map)
}

fn required(attrs: &mut HashMap<String, String>, key: &str, element: &str) -> Result<String> {
    attrs
        .remove(key)
        .ok_or_else(|| Error::msg(format!("{element} is missing required attribute {key}")))
}

fn tier_from(e: &BytesStart) -> Result<Tier> {
    let mut attrs = attributes(e)?;
    Ok(Tier {
        tier_id: required(&mut attrs, "TIER_ID", "TIER")?,
        linguistic_type: required(&mut attrs, "LINGUISTIC_TYPE_REF", "TIER")?,
        participant: attrs.remove("PARTICIPANT"),
        annotator: attrs.remove("ANNOTATOR"),
        annotations: Vec::new(),
    })
}

fn alignable_from(e: &BytesStart) -> Result<Annotation> {
    let mut attrs = attributes(e)?;
    Ok(Annotation::Alignable {
        id: required(&mut attrs, "ANNOTATION_ID", "ALIGNABLE_ANNOTATION")?,
        start_slot: required(&mut attrs, "TIME_SLOT_REF1", "ALIGNABLE_ANNOTATION")?,
        end_slot: required(&mut attrs, "TIME_SLOT_REF2", "ALIGNABLE_ANNOTATION")?,
        value: String::new(),
    })
}

fn ref_from(e: &BytesStart) -> Result<Annotation> {
    let mut attrs = attributes(e)?;
    Ok(Annotation::Ref {
        id: required(&mut attrs, "ANNOTATION_ID", "REF_ANNOTATION")?,
        annotation_ref: required(&mut attrs, "ANNOTATION_REF", "REF_ANNOTATION")?,
        value: String::new(),
    })
}

fn time_slot_from(e: &BytesStart) -> Result<TimeSlot> {
    let mut attrs = attributes(e)?;
    let id = required(&mut attrs, "TIME_SLOT_ID", "TIME_SLOT")?;
    let value_ms = match attrs.remove("TIME_VALUE") {
        Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
            Error::msg(format!("TIME_SLOT {id} has non-numeric TIME_VALUE '{raw}'"))
        })?),
        None => None,
    };
    Ok(TimeSlot { id, value_ms })
}

fn media_from(e: &BytesStart) -> Result<MediaDescriptor> {
    let mut attrs = attributes(e)?;
    Ok(MediaDescriptor {
        media_url: attrs.remove("MEDIA_URL"),
        relative_media_url: attrs.remove("RELATIVE_MEDIA_URL"),
        mime_type: attrs.remove("MIME_TYPE"),
    })
}
