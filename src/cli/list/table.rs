use std::fmt::{self, Write};

use nu_ansi_term::Style;

use crate::cli::ColorMode;

pub(crate) struct Row {
    cells: Vec<String>,
}

impl Row {
    fn is_awk_safe(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| !cell.contains(|c: char| c.is_whitespace()))
    }

    fn columns(&self) -> usize {
        self.cells.len()
    }
}

impl From<Vec<String>> for Row {
    fn from(value: Vec<String>) -> Self {
        Row { cells: value }
    }
}

impl From<Vec<&str>> for Row {
    fn from(value: Vec<&str>) -> Self {
        let value: Vec<String> = value.into_iter().map(|s| s.to_owned()).collect();

        value.into()
    }
}

/// A whitespace-aligned table. Headers never contain whitespace so that
/// headerless output can be consumed by `awk` and `cut`.
pub(crate) struct Table {
    body: Vec<Row>,
    header: Row,
    num_columns: usize,
    print_header: bool,
    color: ColorMode,
}

impl Table {
    pub(crate) fn new<R: Into<Row>>(header: R) -> Table {
        let header = header.into();

        debug_assert!(header.is_awk_safe(), "table header contains whitespace");

        Table {
            num_columns: header.columns(),
            header,
            body: Vec::new(),
            print_header: true,
            color: ColorMode::Off,
        }
    }

    pub(crate) fn print_header(&mut self, print_header: bool) {
        self.print_header = print_header;
    }

    pub(crate) fn color(&mut self, color: ColorMode) {
        self.color = color;
    }

    pub(crate) fn add_row<R: Into<Row>>(&mut self, row: R) {
        let row = row.into();

        debug_assert_eq!(
            row.columns(),
            self.num_columns,
            "row width does not match the table"
        );

        self.body.push(row);
    }

    /// The rows which will be printed
    fn iter_rows(&self) -> impl Iterator<Item = &Row> {
        let header = std::iter::once(&self.header).filter(|_| self.print_header);

        header.chain(self.body.iter())
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0usize; self.num_columns];

        for row in self.iter_rows() {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        widths
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &Row, widths: &[usize], style: Style) -> fmt::Result {
    for (i, (cell, width)) in row.cells.iter().zip(widths).enumerate() {
        let last = i == row.cells.len() - 1;

        // Avoid trailing whitespace on the final column
        let padded = if last {
            cell.clone()
        } else {
            format!("{:<width$}  ", cell, width = width)
        };

        write!(f, "{}", style.paint(padded))?;
    }

    f.write_char('\n')
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        let header_style = match self.color {
            ColorMode::On => Style::new().bold(),
            ColorMode::Off => Style::new(),
        };

        for (i, row) in self.iter_rows().enumerate() {
            let style = if i == 0 && self.print_header {
                header_style
            } else {
                Style::new()
            };

            write_row(f, row, &widths, style)?;
        }

        Ok(())
    }
}
