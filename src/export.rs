use std::io::Cursor;

use chrono::{SecondsFormat, TimeZone, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::format::{format_distance, format_duration};
use crate::types::marker::Marker;
use crate::types::route::Route;

/// Everything the user has recorded, as one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    pub exported_at: String,
    pub routes: Vec<Route>,
    pub markers: Vec<Marker>,
}

impl HistoryExport {
    pub fn new(routes: Vec<Route>, markers: Vec<Marker>) -> Self {
        Self {
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            routes,
            markers,
        }
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// Renders a route as GPX 1.1 with one `trkseg` per segment, tagged with its
/// movement mode.
pub fn route_to_gpx(route: &Route) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    write_route(&mut writer, route).map_err(|e| ExportError::Gpx(e.to_string()))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| ExportError::Gpx(e.to_string()))
}

fn write_route(writer: &mut Writer<Cursor<Vec<u8>>>, route: &Route) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("gpx").with_attributes([
        ("version", "1.1"),
        ("creator", "monotrack-rs"),
        ("xmlns", "http://www.topografix.com/GPX/1/1"),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("metadata")))?;
    if let Some(time) = iso_time(route.start_time_ms) {
        write_text_element(writer, "time", &time)?;
    }
    writer.write_event(Event::End(BytesEnd::new("metadata")))?;

    writer.write_event(Event::Start(BytesStart::new("trk")))?;
    write_text_element(writer, "name", &format!("Route {}", route.id))?;
    let description = format!(
        "{} in {}, {} steps, {:.0} kcal",
        format_distance(route.total_distance_meters),
        format_duration(route.duration_ms()),
        route.total_steps,
        route.total_calories
    );
    write_text_element(writer, "desc", &description)?;

    for segment in &route.segments {
        writer.write_event(Event::Start(BytesStart::new("trkseg")))?;

        for point in &segment.points {
            let lat = point.lat.to_string();
            let lon = point.lng.to_string();
            writer.write_event(Event::Start(
                BytesStart::new("trkpt").with_attributes([("lat", lat.as_str()), ("lon", lon.as_str())]),
            ))?;
            if let Some(time) = iso_time(point.timestamp_ms) {
                write_text_element(writer, "time", &time)?;
            }
            if let Some(accuracy) = point.accuracy_meters {
                // Approximate HDOP from accuracy
                write_text_element(writer, "hdop", &format!("{:.1}", accuracy / 2.0))?;
            }
            writer.write_event(Event::End(BytesEnd::new("trkpt")))?;
        }

        writer.write_event(Event::Start(BytesStart::new("extensions")))?;
        write_text_element(writer, "type", segment.mode.as_str())?;
        writer.write_event(Event::End(BytesEnd::new("extensions")))?;
        writer.write_event(Event::End(BytesEnd::new("trkseg")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("trk")))?;
    writer.write_event(Event::End(BytesEnd::new("gpx")))?;
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn iso_time(timestamp_ms: i64) -> Option<String> {
    if timestamp_ms <= 0 {
        return None;
    }
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}
