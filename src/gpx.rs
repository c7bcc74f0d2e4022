use crate::render::{list_entry, marker_label};
use crate::types::Workout;
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";
const CREATOR: &str = "mapty";

/// Writes every workout as a GPX 1.1 waypoint, so the markers can be
/// opened in any map viewer.
pub fn write_waypoints<W: Write>(workouts: &[Workout], out: W) -> Result<()> {
    let mut xml = Writer::new_with_indent(out, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("writing GPX declaration")?;
    xml.write_event(Event::Start(
        BytesStart::new("gpx").with_attributes([
            ("version", "1.1"),
            ("creator", CREATOR),
            ("xmlns", GPX_NS),
        ]),
    ))
    .context("writing GPX root")?;

    for w in workouts {
        write_waypoint(&mut xml, w).with_context(|| format!("writing waypoint {}", w.id()))?;
    }

    xml.write_event(Event::End(BytesEnd::new("gpx")))
        .context("closing GPX root")?;
    Ok(())
}

pub fn to_string(workouts: &[Workout]) -> Result<String> {
    let mut buf = Vec::new();
    write_waypoints(workouts, &mut buf)?;
    String::from_utf8(buf).context("GPX output is not UTF-8")
}

fn write_waypoint<W: Write>(xml: &mut Writer<W>, w: &Workout) -> Result<()> {
    let lat = w.coords().lat().to_string();
    let lon = w.coords().lng().to_string();

    xml.write_event(Event::Start(
        BytesStart::new("wpt").with_attributes([("lat", lat.as_str()), ("lon", lon.as_str())]),
    ))?;

    let time = w.created_at().to_rfc3339_opts(SecondsFormat::Millis, true);
    text_element(xml, "time", &time)?;
    text_element(xml, "name", &marker_label(w))?;
    text_element(xml, "desc", &list_entry(w))?;
    text_element(xml, "type", w.kind().as_str())?;

    xml.write_event(Event::End(BytesEnd::new("wpt")))?;
    Ok(())
}

fn text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coords;

    #[test]
    fn one_waypoint_per_workout() {
        let workouts = vec![
            Workout::running(Coords::new(32.0, -54.0), 12.0, 35.0, 178.0),
            Workout::cycling(Coords::new(77.0, -100.0), 34.0, 23.0, 43.0),
        ];
        let gpx = to_string(&workouts).unwrap();

        assert!(gpx.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(gpx.matches("<wpt ").count(), 2);
        assert!(gpx.contains(r#"<wpt lat="32" lon="-54">"#));
        assert!(gpx.contains(r#"<wpt lat="77" lon="-100">"#));
        assert!(gpx.contains("<type>running</type>"));
        assert!(gpx.contains("<type>cycling</type>"));
        assert!(gpx.trim_end().ends_with("</gpx>"));
    }

    #[test]
    fn empty_list_is_a_valid_document() {
        let gpx = to_string(&[]).unwrap();
        assert_eq!(gpx.matches("<wpt").count(), 0);
        assert!(gpx.contains("<gpx "));
        assert!(gpx.contains("</gpx>"));
    }
}
