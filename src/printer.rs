//! Printing a loaded record.
//!
//! Printers form a chain: [`RenderingPrinter`] lets a record render itself
//! through [`Schema::output`] and hands anything else to its successor,
//! typically a [`PlainPrinter`].

use std::io::{self, Write};

use crate::schema::Schema;

pub trait Printer {
    fn print(&mut self, target: &mut dyn Schema) -> io::Result<()>;
}

/// Uses the record's own [`Schema::output`] when it provides one.
#[derive(Debug)]
pub struct RenderingPrinter<W, P> {
    writer: W,
    successor: P,
}

impl<W: Write, P: Printer> RenderingPrinter<W, P> {
    pub fn new(writer: W, successor: P) -> Self {
        Self { writer, successor }
    }

    pub fn into_parts(self) -> (W, P) {
        (self.writer, self.successor)
    }
}

impl<W: Write, P: Printer> Printer for RenderingPrinter<W, P> {
    fn print(&mut self, target: &mut dyn Schema) -> io::Result<()> {
        match target.output(&mut self.writer) {
            Some(result) => result,
            None => self.successor.print(target),
        }
    }
}

/// One `field = value` line per declared field.
#[derive(Debug)]
pub struct PlainPrinter<W> {
    writer: W,
}

impl<W: Write> PlainPrinter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Printer for PlainPrinter<W> {
    fn print(&mut self, target: &mut dyn Schema) -> io::Result<()> {
        for field in target.fields() {
            let (info, slot) = field.into_parts();
            writeln!(self.writer, "{} = {}", info.name, slot.render())?;
        }
        self.writer.flush()
    }
}

/// Self-rendering records first, plain dump otherwise, both on stdout.
pub fn default_printer() -> RenderingPrinter<io::Stdout, PlainPrinter<io::Stdout>> {
    RenderingPrinter::new(io::stdout(), PlainPrinter::new(io::stdout()))
}
