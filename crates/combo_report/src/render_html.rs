// crates/combo_report/src/render_html.rs
//
// Offline HTML summary through an embedded minijinja template. No external
// assets; the `.html` template name turns on auto-escaping.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::{AvailabilityReport, ReportError};

static TEMPLATE: &str = r#"<!doctype html>
<html lang="en"><meta charset="utf-8">
<title>Availability · {{ report.pass_kind }}</title>
<style>
body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;margin:24px}
td,th{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}
.on{color:#176117}.off{color:#8a1c1c}.muted{opacity:.7}
</style>
<h1>Availability</h1>
<p>Pass: <strong>{{ report.pass_kind }}</strong> · order: {{ report.selection_order }}
{% if report.catalog_id %} · catalog: <code>{{ report.catalog_id }}</code>{% endif %}</p>
{% if report.catalog_error %}<p class="off">Catalog unavailable: {{ report.catalog_error }}</p>{% endif %}

<h2>Selection</h2>
<ul>
{% for s in report.selection %}  <li>Attribute {{ s.attribute_id }}: {% if s.values %}{{ s.values | join(", ") }}{% else %}<span class="muted">nothing chosen</span>{% endif %}</li>
{% endfor %}</ul>

<h2>Values</h2>
<table>
<tr><th>Attribute</th><th>Enabled</th><th>Disabled</th><th>Untouched</th><th>Matched</th></tr>
{% for r in rows %}<tr><td>{{ r.attribute_id }}</td><td class="on">{{ r.enabled | join(", ") }}</td><td class="off">{{ r.disabled | join(", ") }}</td><td class="muted">{{ r.untouched | join(", ") }}</td><td>{{ r.matched }}{% if r.impossible %} (impossible){% endif %}</td></tr>
{% endfor %}</table>
{% if report.unlisted %}
<p class="muted">Unlisted values: {% for u in report.unlisted %}{{ u.value_id }}={{ "on" if u.enabled else "off" }}{% if not loop.last %}, {% endif %}{% endfor %}</p>
{% endif %}
<p>Totals: {{ report.totals.enabled }} enabled, {{ report.totals.disabled }} disabled, {{ report.totals.untouched }} untouched.</p>
</html>
"#;

pub fn render_html(report: &AvailabilityReport) -> Result<String, ReportError> {
    let mut env = Environment::new();
    env.add_template("report.html", TEMPLATE)
        .map_err(|e| ReportError::Template(e.to_string()))?;
    let tmpl = env
        .get_template("report.html")
        .map_err(|e| ReportError::Template(e.to_string()))?;

    tmpl.render(context! { report => report, rows => rows(report) })
        .map_err(|e| ReportError::Template(e.to_string()))
}

/// One table row: the attribute's values joined with its trace entry.
#[derive(Serialize)]
struct Row<'a> {
    attribute_id: u32,
    enabled: &'a [u32],
    disabled: &'a [u32],
    untouched: &'a [u32],
    /// "-" when the attribute was not part of the pass.
    matched: String,
    impossible: bool,
}

fn rows(report: &AvailabilityReport) -> Vec<Row<'_>> {
    report
        .attributes
        .iter()
        .map(|a| {
            let t = report.trace.iter().find(|t| t.attribute_id == a.attribute_id);
            Row {
                attribute_id: a.attribute_id,
                enabled: &a.enabled,
                disabled: &a.disabled,
                untouched: &a.untouched,
                matched: t.map_or_else(|| "-".to_string(), |t| t.matched.to_string()),
                impossible: t.is_some_and(|t| t.impossible),
            }
        })
        .collect()
}
