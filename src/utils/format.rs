//! Number formatting and plain-text tables for human-readable output.

/// Round `value` to `decimals` places
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Integer with thousands separators.
///
/// # Examples
///
/// ```
/// use seqfish::utils::format::comma;
///
/// assert_eq!(comma(1_234_567), "1,234,567");
/// assert_eq!(comma(12), "12");
/// ```
#[must_use]
pub fn comma(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Float with thousands separators and no trailing zeros (`1234.50` is `1,234.5`)
#[must_use]
pub fn commaf(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{}", value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Column of a [`render_table`] table
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub header: &'a str,
    pub align_right: bool,
}

impl<'a> Column<'a> {
    #[must_use]
    pub fn left(header: &'a str) -> Self {
        Self {
            header,
            align_right: false,
        }
    }

    #[must_use]
    pub fn right(header: &'a str) -> Self {
        Self {
            header,
            align_right: true,
        }
    }
}

/// Render rows as a space-aligned table with a header line.
///
/// Columns are separated by two spaces; trailing spaces are trimmed.
#[must_use]
pub fn render_table(columns: &[Column<'_>], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.header.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: Vec<&str>| {
        let line = cells
            .iter()
            .zip(columns.iter().zip(&widths))
            .map(|(cell, (column, &width))| {
                if column.align_right {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let mut out = render_line(columns.iter().map(|c| c.header).collect());
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
