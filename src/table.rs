use crate::chart::Figure;
use crate::parser::archiver::ArchiveRun;
use crate::parser::collatz::CollatzRun;
use crate::parser::mergesort::{DistributedSort, ParallelSort, SequentialSort};
use prettytable::{row, Row, Table};

/// A row type that can be printed as a table.
pub trait TableRow {
    fn header() -> Row;
    fn cells(&self) -> Row;
}

impl TableRow for CollatzRun {
    fn header() -> Row {
        row!["Dynamic", "Threads", "Chunk Size", "Time (s)"]
    }

    fn cells(&self) -> Row {
        let dynamic = match self.dynamic {
            Some(true) => "ON",
            Some(false) => "OFF",
            None => "-",
        };
        row![dynamic, self.num_thread, self.chunk_size, format!("{:.3}", self.time)]
    }
}

impl TableRow for ArchiveRun {
    fn header() -> Row {
        row!["Program", "Operation", "Input", "Threads", "Time (s)"]
    }

    fn cells(&self) -> Row {
        row![
            self.program,
            self.operation.short_name(),
            self.input,
            self.threads,
            format!("{:.3}", self.time)
        ]
    }
}

impl TableRow for SequentialSort {
    fn header() -> Row {
        row!["Size", "Payload", "Time (s)"]
    }

    fn cells(&self) -> Row {
        row![self.size, self.payload, format!("{:.3}", self.time)]
    }
}

impl TableRow for ParallelSort {
    fn header() -> Row {
        row!["Size", "Payload", "Threads", "Time (s)"]
    }

    fn cells(&self) -> Row {
        row![self.size, self.payload, self.threads, format!("{:.3}", self.time)]
    }
}

impl TableRow for DistributedSort {
    fn header() -> Row {
        row!["Nodes", "Size", "Payload", "Threads", "Time (s)"]
    }

    fn cells(&self) -> Row {
        row![self.nodes, self.size, self.payload, self.threads, format!("{:.3}", self.time)]
    }
}

/// Builds the table for `rows`, header first.
pub fn build_table<R: TableRow>(rows: &[R]) -> Table {
    let mut table = Table::new();
    table.add_row(R::header());
    for r in rows {
        table.add_row(r.cells());
    }
    table
}

/// Prints an aggregated table under a title.
pub fn print_table<R: TableRow>(title: &str, rows: &[R]) {
    println!("\n{} ({} rows)", title, rows.len());
    build_table(rows).printstd();
}

/// Prints every series of `figure`, one table per panel.
pub fn print_figure(figure: &Figure) {
    for panel in &figure.panels {
        let mut table = Table::new();
        table.add_row(row!["Series", panel.x_label, panel.y_label]);

        for series in &panel.series {
            for &(x, y) in &series.points {
                table.add_row(row![series.label, x, format!("{:.4}", y)]);
            }
        }
        for reference in &panel.references {
            table.add_row(row![reference.label(), "-", "-"]);
        }

        println!("\n{}", panel.title);
        table.printstd();
    }
}
