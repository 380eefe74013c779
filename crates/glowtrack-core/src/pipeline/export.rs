//! Self-contained HTML progress report.
//!
//! Only redacted photos are embedded. The report has no external stylesheet or
//! script and is suitable for printing or archival.

use std::fmt::{self, Display, Formatter};

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

use super::timeline::timeline_for;
use crate::domain::{ComplicationSeverity, Procedure, ProgressEntry};

const STYLE: &str = "\
    body { font-family: system-ui, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
    .header { text-align: center; border-bottom: 2px solid #eee; padding-bottom: 20px; margin-bottom: 20px; }
    .procedure-info { background: #f5f3ff; padding: 16px; border-radius: 12px; margin-bottom: 20px; }
    .entry { border: 1px solid #ddd; border-radius: 12px; margin-bottom: 16px; overflow: hidden; }
    .entry-header { background: #f9fafb; padding: 12px; display: flex; justify-content: space-between; }
    .entry-content { padding: 12px; display: flex; gap: 16px; }
    .entry-image { width: 150px; height: 150px; object-fit: cover; border-radius: 8px; }
    .verified { background: #dcfce7; color: #166534; padding: 4px 8px; border-radius: 9999px; font-size: 12px; }
    .test { background: #fef3c7; color: #92400e; padding: 4px 8px; border-radius: 9999px; font-size: 12px; }
    .complication { background: #fef2f2; color: #991b1b; padding: 4px 8px; border-radius: 9999px; font-size: 12px; }
    .hash { font-family: monospace; font-size: 10px; color: #9ca3af; margin-top: 8px; }
    .disclaimer { font-size: 11px; color: #6b7280; border-top: 1px solid #eee; padding-top: 16px; margin-top: 20px; }";

const DISCLAIMER: &str = "Photos marked as \"Verified\" were captured directly within the \
    application and include cryptographic hash verification (SHA-256). Test uploads carry no \
    integrity guarantee. This report was generated for documentation purposes. Photo hashes can \
    be independently verified to confirm image integrity has not been compromised.";

/// Renders the report for `procedure`, embedding its entries oldest first.
///
/// Entries belonging to other procedures are ignored.
#[must_use]
pub fn render_report(
    procedure: &Procedure,
    entries: &[ProgressEntry],
    generated_at: OffsetDateTime,
) -> String {
    let timeline = timeline_for(procedure, entries);
    HtmlReport {
        procedure,
        entries: timeline.oldest_first(),
        generated_at,
    }
    .to_string()
}

struct HtmlReport<'a> {
    procedure: &'a Procedure,
    entries: Vec<&'a ProgressEntry>,
    generated_at: OffsetDateTime,
}

impl Display for HtmlReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let p = self.procedure;
        let name = escape(p.display_name());

        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html>")?;
        writeln!(f, "<head>")?;
        writeln!(f, "  <meta charset=\"UTF-8\">")?;
        writeln!(f, "  <title>Procedure Report - {name}</title>")?;
        writeln!(f, "  <style>\n{STYLE}\n  </style>")?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;

        writeln!(f, "  <div class=\"header\">")?;
        writeln!(f, "    <h1>Procedure Progress Report</h1>")?;
        writeln!(f, "    <p>Generated: {}</p>", human_time(self.generated_at))?;
        writeln!(f, "  </div>")?;

        writeln!(f, "  <div class=\"procedure-info\">")?;
        writeln!(f, "    <h2>Procedure Details</h2>")?;
        writeln!(f, "    <p><strong>Type:</strong> {name}</p>")?;
        writeln!(f, "    <p><strong>Date:</strong> {}</p>", p.date_performed)?;
        if let Some(provider) = &p.provider {
            writeln!(f, "    <p><strong>Provider:</strong> {}</p>", escape(provider))?;
        }
        if let Some(clinic) = &p.clinic {
            writeln!(f, "    <p><strong>Clinic:</strong> {}</p>", escape(clinic))?;
        }
        writeln!(f, "  </div>")?;

        writeln!(
            f,
            "  <h2>Progress Timeline ({} entries)</h2>",
            self.entries.len()
        )?;
        for entry in &self.entries {
            write_entry(f, entry)?;
        }

        writeln!(f, "  <div class=\"disclaimer\">")?;
        writeln!(f, "    <p><strong>Verification Notice</strong></p>")?;
        writeln!(f, "    <p>{DISCLAIMER}</p>")?;
        writeln!(f, "  </div>")?;
        writeln!(f, "</body>")?;
        write!(f, "</html>")
    }
}

fn write_entry(f: &mut Formatter<'_>, entry: &ProgressEntry) -> fmt::Result {
    let day = entry.days_since_procedure();

    writeln!(f, "  <div class=\"entry\">")?;
    writeln!(f, "    <div class=\"entry-header\">")?;
    writeln!(
        f,
        "      <span><strong>Day {day}</strong> - {}</span>",
        human_time(entry.timestamp())
    )?;
    write!(f, "      <span>")?;
    if entry.verified() {
        write!(f, "<span class=\"verified\">&#10003; Verified</span>")?;
    } else {
        write!(f, "<span class=\"test\">Test</span>")?;
    }
    if let Some(c) = entry
        .complication()
        .filter(|c| c.severity != ComplicationSeverity::None)
    {
        write!(f, " <span class=\"complication\">{}</span>", c.severity.as_str())?;
    }
    writeln!(f, "</span>")?;
    writeln!(f, "    </div>")?;

    writeln!(f, "    <div class=\"entry-content\">")?;
    writeln!(
        f,
        "      <img src=\"{}\" class=\"entry-image\" alt=\"Day {day}\">",
        escape(entry.photo_protected())
    )?;
    writeln!(f, "      <div>")?;
    if let Some(rating) = entry.rating() {
        writeln!(f, "        <p><strong>Rating:</strong> {}</p>", rating.stars())?;
    }
    if let Some(after_care) = entry.after_care() {
        let followed = if after_care.followed_instructions {
            "Yes"
        } else {
            "No"
        };
        writeln!(f, "        <p><strong>Aftercare followed:</strong> {followed}</p>")?;
    }
    if let Some(notes) = entry.notes() {
        writeln!(f, "        <p><strong>Notes:</strong> {}</p>", escape(notes))?;
    }
    if let Some(description) = entry.complication().and_then(|c| c.description.as_deref()) {
        writeln!(
            f,
            "        <p><strong>Complication:</strong> {}</p>",
            escape(description)
        )?;
    }
    if let Some(v) = entry.verification() {
        let timestamp = v.timestamp.format(&Rfc3339).map_err(|_| fmt::Error)?;
        writeln!(
            f,
            "        <p class=\"hash\">Hash: {}<br>Timestamp: {timestamp}</p>",
            escape(&v.hash)
        )?;
    }
    writeln!(f, "      </div>")?;
    writeln!(f, "    </div>")?;
    writeln!(f, "  </div>")
}

fn human_time(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute] UTC[offset_hour sign:mandatory]:[offset_minute]");
    at.format(format).unwrap_or_else(|_| at.to_string())
}

/// Escapes text for HTML element content and double-quoted attributes.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
