//! The forward-sweep pass driver.
//!
//! A [`Pass`] makes a single sweep over a program, advancing the
//! built-in trackers for each instruction and then letting every
//! registered [`Observer`] inspect the instruction together with the
//! freshly updated state. Observers report findings through the shared
//! [`Report`]; they never abort the sweep.

use camber_core::geom::Point;
use camber_core::instr::Instruction;
use camber_core::program::Program;

use crate::state::Tracked;

/// Accumulated warnings from one sweep.
///
/// Warnings are the only channel for non-fatal findings; the count is
/// the exit contract (0 = clean). Each warning is also emitted on the
/// `log` facade at warn level.
#[derive(Debug, Default)]
pub struct Report {
    warnings: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.warnings.push(message);
    }

    /// Number of warnings recorded so far.
    pub fn count(&self) -> u32 {
        self.warnings.len() as u32
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// A consumer of the sweep: sees each instruction after the trackers
/// have incorporated it.
pub trait Observer {
    fn observe(
        &mut self,
        index: usize,
        instr: &Instruction,
        tracked: &Tracked,
        report: &mut Report,
    );
}

/// One analysis sweep over a program.
pub struct Pass<'p> {
    program: &'p Program,
    tracked: Tracked,
    report: Report,
}

impl<'p> Pass<'p> {
    /// Creates a pass that will replay `program` from `origin`.
    pub fn new(program: &'p Program, origin: Point) -> Self {
        Self {
            program,
            tracked: Tracked::new(origin),
            report: Report::new(),
        }
    }

    /// Runs the sweep, feeding every instruction to the observers.
    pub fn exec(&mut self, observers: &mut [&mut dyn Observer]) {
        for (index, instr) in self.program.iter().enumerate() {
            self.tracked.update(instr);
            for observer in observers.iter_mut() {
                observer.observe(index, instr, &self.tracked, &mut self.report);
            }
        }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn into_report(self) -> Report {
        self.report
    }
}

/// Convenience wrapper: build a pass, run it, return the report.
pub fn run(program: &Program, origin: Point, observers: &mut [&mut dyn Observer]) -> Report {
    let mut pass = Pass::new(program, origin);
    pass.exec(observers);
    pass.into_report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camber_core::geom::point;

    /// Counts rapid moves it observes.
    struct RapidCounter {
        seen: usize,
    }

    impl Observer for RapidCounter {
        fn observe(
            &mut self,
            _index: usize,
            instr: &Instruction,
            _tracked: &Tracked,
            _report: &mut Report,
        ) {
            if instr.is_rapid() {
                self.seen += 1;
            }
        }
    }

    #[test]
    fn test_pass_visits_every_instruction() {
        let mut prog = Program::new();
        prog.push(Instruction::rapid(1.0, 0.0, 0.0));
        prog.push(Instruction::SpindleOn);
        prog.push(Instruction::rapid(2.0, 0.0, 0.0));
        prog.push(Instruction::EndProgram);

        let mut counter = RapidCounter { seen: 0 };
        let report = run(&prog, point(0.0, 0.0, 0.0), &mut [&mut counter]);
        assert_eq!(counter.seen, 2);
        assert!(report.is_clean());
    }

    #[test]
    fn test_report_counts_warnings() {
        let mut report = Report::new();
        assert!(report.is_clean());
        report.add_warning("first");
        report.add_warning("second");
        assert_eq!(report.count(), 2);
        assert_eq!(report.warnings().len(), 2);
    }
}
