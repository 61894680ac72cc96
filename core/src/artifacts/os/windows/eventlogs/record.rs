use super::error::EventLogsError;
use log::debug;
use quick_xml::{
    events::{BytesStart, Event},
    name::{Namespace, ResolveResult},
    NsReader,
};

/// Namespace every `EventLog` record element belongs to
const EVENT_NAMESPACE: &[u8] = b"http://schemas.microsoft.com/win/2004/08/events/event";

const EVENT_ID_PATH: [&[u8]; 3] = [b"Event", b"System", b"EventID"];
const TIME_CREATED_PATH: [&[u8]; 3] = [b"Event", b"System", b"TimeCreated"];

/// The parts of a record needed to filter and timestamp it
#[derive(Debug, PartialEq)]
pub(crate) struct EventSummary {
    pub(crate) event_id: u32,
    pub(crate) system_time: Option<String>,
}

/// Read `System/EventID` and `System/TimeCreated@SystemTime` from a record's XML
/// Only elements in the event namespace are matched
pub(crate) fn parse_event_xml(xml: &str) -> Result<EventSummary, EventLogsError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    // Local names of the open elements. `None` for elements outside the event namespace
    let mut stack: Vec<Option<Vec<u8>>> = Vec::new();
    let mut event_id = None;
    let mut system_time = None;

    loop {
        match reader.read_resolved_event() {
            Err(err) => {
                debug!("[eventlogs] Could not read record xml: {err:?}");
                return Err(EventLogsError::Xml);
            }
            Ok((_, Event::Eof)) => break,
            Ok((namespace, Event::Start(tag))) => {
                stack.push(event_element(&namespace, &tag));
                if system_time.is_none() && at_path(&stack, &TIME_CREATED_PATH) {
                    system_time = get_system_time(&tag);
                }
            }
            Ok((namespace, Event::Empty(tag))) => {
                stack.push(event_element(&namespace, &tag));
                if system_time.is_none() && at_path(&stack, &TIME_CREATED_PATH) {
                    system_time = get_system_time(&tag);
                }
                stack.pop();
            }
            Ok((_, Event::Text(text))) => {
                if event_id.is_none() && at_path(&stack, &EVENT_ID_PATH) {
                    let value = match text.unescape() {
                        Ok(result) => result,
                        Err(err) => {
                            debug!("[eventlogs] Could not unescape EventID: {err:?}");
                            return Err(EventLogsError::Xml);
                        }
                    };
                    event_id = value.trim().parse::<u32>().ok();
                }
            }
            Ok((_, Event::End(_))) => {
                stack.pop();
            }
            _ => continue,
        }
    }

    match event_id {
        Some(event_id) => Ok(EventSummary {
            event_id,
            system_time,
        }),
        None => Err(EventLogsError::NoEventId),
    }
}

/// Get the local name of an element if it belongs to the event namespace
fn event_element(namespace: &ResolveResult<'_>, tag: &BytesStart<'_>) -> Option<Vec<u8>> {
    match namespace {
        ResolveResult::Bound(Namespace(name)) if *name == EVENT_NAMESPACE => {
            Some(tag.local_name().as_ref().to_vec())
        }
        _ => None,
    }
}

/// Check if the open elements are exactly the provided path
fn at_path(stack: &[Option<Vec<u8>>], path: &[&[u8]]) -> bool {
    stack.len() == path.len()
        && stack
            .iter()
            .zip(path)
            .all(|(element, expected)| element.as_deref() == Some(*expected))
}

fn get_system_time(tag: &BytesStart<'_>) -> Option<String> {
    for attr in tag.attributes().flatten() {
        if attr.key.local_name().as_ref() != b"SystemTime" {
            continue;
        }
        return match attr.unescape_value() {
            Ok(value) => Some(value.to_string()),
            Err(err) => {
                debug!("[eventlogs] Could not read SystemTime: {err:?}");
                None
            }
        };
    }
    None
}
