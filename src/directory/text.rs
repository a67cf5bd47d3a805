//! Plain-text rendering of a directory snapshot for terminal front ends.

use std::fmt::Write;

use crate::directory::controller::DirectorySnapshot;
use crate::domain::member::Member;

const HEADERS: [&str; 7] = [
    "ID",
    "Full Name",
    "Phone Number",
    "Blood Group",
    "Present Address",
    "Category",
    "Date of Birth",
];

fn cells(member: &Member) -> [String; 7] {
    [
        member.id_no.clone(),
        member.full_name.clone(),
        member.phone_number.clone(),
        member.blood_group.clone().unwrap_or_default(),
        member.present_address.clone().unwrap_or_default(),
        member
            .category
            .map(|c| c.as_str().to_string())
            .unwrap_or_default(),
        member.dob.map(|d| d.to_string()).unwrap_or_default(),
    ]
}

fn push_row(out: &mut String, row: &[String], widths: &[usize]) {
    let line = row
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Summary lines, the members table and the pager line.
pub fn render_snapshot(snapshot: &DirectorySnapshot) -> String {
    let result = &snapshot.result;
    let query = &snapshot.query;
    let mut out = String::new();

    let _ = writeln!(out, "Total Members: {}", result.counts.total);
    let _ = writeln!(out, "Category A: {}", result.counts.category_a);
    let _ = writeln!(out, "Category B: {}", result.counts.category_b);

    let category = query.category.map(|c| c.as_str()).unwrap_or("any");
    let _ = writeln!(
        out,
        "Search: {:?}  Category: {category}",
        query.search
    );
    if let Some(error) = &result.error {
        let _ = writeln!(out, "Error: {error}");
    }
    if result.loading {
        out.push_str("Loading...\n");
    }

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let rows: Vec<[String; 7]> = result.members.iter().map(cells).collect();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_row(&mut out, &header, &widths);
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    out.push_str(&rule);
    out.push('\n');

    if rows.is_empty() {
        out.push_str("No members found.\n");
    }
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    let _ = writeln!(out, "Page {} of {}", query.page, result.total_pages);
    out
}
