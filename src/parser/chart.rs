//! DrawingML chart part reader.
//!
//! Reads the cached title, series names, category labels and values from a
//! `c:chartSpace` part. Live spreadsheet formulas are not evaluated; only
//! the caches the authoring application wrote are used.

use crate::error::Result;
use crate::model::{Chart, ChartPoint, ChartSeries};

use super::xml_tree::{self, XmlElement};

/// Parse a chart part.
pub fn parse_chart(xml: &str) -> Result<Chart> {
    let root = xml_tree::parse(xml, "Chart")?;
    let chart_el = if root.local_name() == "chart" {
        &root
    } else {
        match root.child_local("chart") {
            Some(c) => c,
            None => return Ok(Chart::default()),
        }
    };

    let title = chart_el.child_local("title").and_then(title_text);

    let series = chart_el
        .child_local("plotArea")
        .and_then(|area| area.elements().find(|e| e.local_name().ends_with("Chart")))
        .map(|plot| {
            plot.elements()
                .filter(|e| e.local_name() == "ser")
                .enumerate()
                .map(|(i, ser)| read_series(ser, i))
                .collect()
        })
        .unwrap_or_default();

    Ok(Chart { title, series })
}

fn title_text(title: &XmlElement) -> Option<String> {
    let tx = title.child_local("tx")?;
    if let Some(cached) = tx.child_local("strRef").and_then(first_cached_value) {
        return Some(cached);
    }
    let mut runs = Vec::new();
    tx.find_all_local("t", &mut runs);
    let text: String = runs.iter().map(|t| t.text()).collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn read_series(ser: &XmlElement, index: usize) -> ChartSeries {
    let key = ser
        .child_local("tx")
        .and_then(|tx| {
            tx.child_local("strRef")
                .and_then(first_cached_value)
                .or_else(|| tx.child_local("v").map(|v| v.text().trim().to_string()))
        })
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| format!("系列 {}", index + 1));

    let categories = ser
        .child_local("cat")
        .or_else(|| ser.child_local("xVal"))
        .map(cached_points)
        .unwrap_or_default();

    let points = ser
        .child_local("val")
        .or_else(|| ser.child_local("yVal"))
        .map(cached_points)
        .unwrap_or_default()
        .into_iter()
        .map(|(x, y)| ChartPoint { x, y })
        .collect();

    ChartSeries {
        key,
        categories,
        points,
    }
}

/// `c:pt` entries under any cache or literal, keyed by `idx`, first entry
/// per index wins (multi-level category caches repeat indices).
fn cached_points(el: &XmlElement) -> Vec<(usize, String)> {
    let mut pts = Vec::new();
    el.find_all_local("pt", &mut pts);
    let mut out: Vec<(usize, String)> = Vec::with_capacity(pts.len());
    for (pos, pt) in pts.iter().enumerate() {
        let idx = pt
            .attr("idx")
            .and_then(|i| i.parse().ok())
            .unwrap_or(pos);
        if out.iter().any(|(i, _)| *i == idx) {
            continue;
        }
        let value = pt
            .child_local("v")
            .map(|v| v.text().trim().to_string())
            .unwrap_or_default();
        out.push((idx, value));
    }
    out.sort_by_key(|(i, _)| *i);
    out
}

fn first_cached_value(str_ref: &XmlElement) -> Option<String> {
    cached_points(str_ref)
        .into_iter()
        .next()
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}
