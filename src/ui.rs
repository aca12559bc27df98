//! Terminal output helpers.
//!
//! - `banner` - stage divider (`compiling...`, `deploying...`, `done`)
//! - `Table` - box-drawn table, used for the release summary

use colored::*;
use std::cmp;

pub const DIVIDER_WIDTH: usize = 80;

pub fn divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}

pub fn banner_lines(title: &str) -> [String; 3] {
    let pad = DIVIDER_WIDTH.saturating_sub(title.chars().count()) / 2;
    [divider(), format!("{}{}", " ".repeat(pad), title), divider()]
}

pub fn banner(title: &str) {
    let [top, middle, bottom] = banner_lines(title);
    println!("{}", top.dimmed());
    println!("{}", middle.bold());
    println!("{}", bottom.dimmed());
}

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render to lines, shrinking the widest column until the table fits
    /// `max_width`.
    pub fn render(&self, max_width: usize) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = cmp::max(widths[i], console::measure_text_width(cell));
            }
        }

        let overhead = 3 + 3 * widths.len();
        let budget = max_width.saturating_sub(overhead);
        while widths.iter().sum::<usize>() > budget {
            let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widest <= 8 {
                break;
            }
            widths[idx] -= 1;
        }

        let sep = |left: &str, mid: &str, right: &str| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}", left, inner.join(mid), right)
        };
        let line = |cells: &[String]| {
            let mut s = String::from("  │");
            for (cell, width) in cells.iter().zip(&widths) {
                let shown = console::truncate_str(cell, *width, "...");
                let padding = width.saturating_sub(console::measure_text_width(&shown));
                s.push_str(&format!(" {}{} │", shown, " ".repeat(padding)));
            }
            s
        };

        let mut out = vec![
            sep("┌", "┬", "┐"),
            line(self.headers.as_slice()),
            sep("├", "┼", "┤"),
        ];
        out.extend(self.rows.iter().map(|row| line(row.as_slice())));
        out.push(sep("└", "┴", "┘"));
        out
    }

    pub fn print(&self) {
        let (_rows, cols) = console::Term::stdout().size();
        for line in self.render(cols as usize) {
            println!("{}", line);
        }
    }
}
