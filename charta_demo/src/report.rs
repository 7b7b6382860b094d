// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-page HTML gallery of the rendered charts.

use core::fmt::Write as _;

/// One rendered chart.
#[derive(Debug)]
pub(crate) struct Section {
    /// Heading and file stem.
    pub(crate) name: &'static str,
    /// End-state markup.
    pub(crate) svg: String,
    /// A frame part-way through the entry animation, for charts that animate.
    pub(crate) midway: Option<String>,
}

pub(crate) fn render_report(title: &str, sections: &[Section]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title>\n\
         <style>body{{font-family:sans-serif;margin:2rem}}section{{margin-bottom:2rem}}\
         .frames{{display:flex;gap:1rem}}svg{{border:1px solid #ddd}}</style></head><body>\n\
         <h1>{title}</h1>\n"
    );
    for section in sections {
        let _ = write!(out, "<section id=\"{0}\"><h2>{0}</h2><div class=\"frames\">", section.name);
        if let Some(midway) = &section.midway {
            out.push_str(midway);
        }
        out.push_str(&section.svg);
        out.push_str("</div></section>\n");
    }
    out.push_str("</body></html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_appear_in_order() {
        let sections = [
            Section {
                name: "pie",
                svg: "<svg id=\"a\"/>".into(),
                midway: None,
            },
            Section {
                name: "bar",
                svg: "<svg id=\"b\"/>".into(),
                midway: Some("<svg id=\"b0\"/>".into()),
            },
        ];
        let html = render_report("Gallery", &sections);
        let a = html.find("id=\"a\"");
        let b0 = html.find("id=\"b0\"");
        let b = html.find("id=\"b\"");
        assert!(a < b0 && b0 < b, "sections keep their order with the midway frame first");
        assert!(html.contains("<h1>Gallery</h1>"), "title is rendered");
    }
}
