//! Static HTML rendering of the assignment report
//!
//! One titled section per category; empty categories still render their
//! placeholder rows. Records inside a section are ordered by platform tag
//! here, at assembly time, so the aggregator itself never re-sorts.

use crate::graph::groups::Group;
use crate::report::aggregator::AssignmentRecord;
use crate::report::categories::PolicyCategory;
use chrono::Local;
use std::collections::BTreeMap;

/// Generate the complete HTML report document
pub fn render(group: &Group, results: &BTreeMap<PolicyCategory, Vec<AssignmentRecord>>) -> String {
    let css = get_css_styles();
    let header = generate_header(group, results);
    let sections: String = results
        .iter()
        .map(|(category, records)| generate_section(*category, records))
        .collect();
    let footer = generate_footer();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Intune Assignments - {group_name}</title>
    <style>
{css}
    </style>
</head>
<body>
    <div class="container">
{header}
{sections}
{footer}
    </div>
</body>
</html>"#,
        group_name = escape_html(&group.display_name),
        css = css,
        header = header,
        sections = sections,
        footer = footer,
    )
}

fn generate_header(group: &Group, results: &BTreeMap<PolicyCategory, Vec<AssignmentRecord>>) -> String {
    let total_assignments: usize = results
        .values()
        .flatten()
        .filter(|r| !r.is_sentinel)
        .count();

    format!(
        r#"        <header>
            <h1>Intune Assignment Report</h1>
            <div class="meta">
                <div><span class="label">Group</span> {group_name}</div>
                <div><span class="label">Group ID</span> <code>{group_id}</code></div>
                <div><span class="label">Generated</span> {generated}</div>
                <div><span class="label">Categories</span> {categories}</div>
                <div><span class="label">Assignments found</span> {total}</div>
            </div>
        </header>"#,
        group_name = escape_html(&group.display_name),
        group_id = escape_html(&group.id),
        generated = Local::now().format("%Y-%m-%d %H:%M:%S"),
        categories = results.len(),
        total = total_assignments,
    )
}

fn generate_section(category: PolicyCategory, records: &[AssignmentRecord]) -> String {
    // Report-assembly ordering: group the fan-out endpoints together by
    // platform tag. The sort is stable, so remote listing order survives
    // within each tag.
    let mut ordered: Vec<&AssignmentRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.sub_label.cmp(&b.sub_label));

    let has_sub_labels = ordered.iter().any(|r| r.sub_label.is_some());
    let sub_label_header = if has_sub_labels {
        "<th>Platform</th>"
    } else {
        ""
    };

    let rows: String = ordered
        .iter()
        .map(|record| {
            let name = if record.is_sentinel {
                format!(r#"<span class="sentinel">{}</span>"#, escape_html(&record.display_name))
            } else {
                escape_html(&record.display_name)
            };
            let sub_label_cell = if has_sub_labels {
                format!(
                    "<td>{}</td>",
                    record.sub_label.as_deref().map(escape_html).unwrap_or_default()
                )
            } else {
                String::new()
            };
            let last_modified = record
                .last_modified
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "—".to_string());

            format!(
                "                <tr><td>{}</td>{}<td>{}</td></tr>\n",
                name, sub_label_cell, last_modified
            )
        })
        .collect();

    format!(
        r#"        <section>
            <h2>{title}</h2>
            <table>
                <thead><tr><th>Name</th>{sub_label_header}<th>Last Modified</th></tr></thead>
                <tbody>
{rows}                </tbody>
            </table>
        </section>
"#,
        title = category.display_name(),
        sub_label_header = sub_label_header,
        rows = rows,
    )
}

fn generate_footer() -> String {
    format!(
        r#"        <footer>
            Generated by asg365 v{}
        </footer>"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape remote-controlled strings before interpolation into markup
fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// File name for the written report, derived from the group display name
pub fn report_filename(group: &Group) -> String {
    format!(
        "IntuneAssignments_{}.html",
        sanitize_filename(&group.display_name)
    )
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            _ => c,
        })
        .collect()
}

fn get_css_styles() -> &'static str {
    r#"
        :root {
            --primary: #1e40af;
            --secondary: #64748b;
            --light: #f8fafc;
            --dark: #1e293b;
            --border: #e2e8f0;
        }

        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: 'Segoe UI', system-ui, -apple-system, sans-serif;
            line-height: 1.6;
            color: var(--dark);
            background: var(--light);
        }

        .container {
            max-width: 1000px;
            margin: 0 auto;
            padding: 2rem;
        }

        header {
            background: var(--primary);
            color: white;
            padding: 1.5rem 2rem;
            border-radius: 8px;
            margin-bottom: 2rem;
        }

        header h1 {
            font-size: 1.5rem;
            margin-bottom: 0.75rem;
        }

        .meta {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
            gap: 0.25rem 1.5rem;
            font-size: 0.9rem;
        }

        .meta .label {
            opacity: 0.75;
            margin-right: 0.5rem;
        }

        .meta code {
            font-size: 0.85em;
        }

        section {
            background: white;
            border: 1px solid var(--border);
            border-radius: 8px;
            padding: 1.25rem 1.5rem;
            margin-bottom: 1.5rem;
        }

        section h2 {
            font-size: 1.1rem;
            color: var(--primary);
            margin-bottom: 0.75rem;
        }

        table {
            width: 100%;
            border-collapse: collapse;
        }

        th, td {
            text-align: left;
            padding: 0.5rem 0.75rem;
            border-bottom: 1px solid var(--border);
        }

        th {
            color: var(--secondary);
            font-size: 0.8rem;
            text-transform: uppercase;
            letter-spacing: 0.03em;
        }

        tr:last-child td {
            border-bottom: none;
        }

        .sentinel {
            color: var(--secondary);
            font-style: italic;
        }

        footer {
            text-align: center;
            color: var(--secondary);
            font-size: 0.8rem;
        }
    "#
}
