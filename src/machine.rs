use crate::config::{CaptureStyle, Config};
use crate::event::Value;
use crate::expand::{expand, nargs};
use crate::key::InputEvent;
use crate::program::{Inst, InstPtr, Program};
use crate::stack::Stack;

/// Lifecycle of a parse branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Running,
    /// Waiting for another event before it can consume.
    Blocked,
    Failed,
    /// Finished matching successfully.
    Done,
}

impl Status {
    pub fn is_finished(self) -> bool {
        matches!(self, Status::Failed | Status::Done)
    }
}

/// One candidate parse branch through the program.
///
/// Every stack is persistent, so cloning a machine on a split is O(1) and the
/// two copies never observe each other's updates.
#[derive(Debug, Clone, Default)]
pub(crate) struct Machine {
    pc: InstPtr,
    // index of the next buffered event to consume
    sp: usize,
    caps: Stack<usize>,
    vars: Stack<Value>,
    // expanded templates of completed captures, waiting to become arguments
    results: Stack<String>,
    returns: Stack<InstPtr>,
    // payload of each consumed event, one per buffer slot below `sp`
    payloads: Stack<Value>,
    // instructions run since the last consumed event
    idle: usize,
    status: Status,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pc(&self) -> InstPtr {
        self.pc
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn unblock(&mut self) {
        if self.status == Status::Blocked {
            self.status = Status::Running;
        }
    }

    /// A copy of this machine resumed at `pc`.
    pub fn fork(&self, pc: InstPtr) -> Machine {
        Machine { pc, ..self.clone() }
    }

    /// Executes one instruction. Returns the address a forked copy should
    /// start at when the instruction is a split.
    pub fn step(&mut self, program: &Program, events: &[InputEvent], config: &Config) -> Option<InstPtr> {
        let Some(inst) = program.get(self.pc) else {
            // ran off the end of the program
            self.status = Status::Done;
            return None;
        };
        if self.idle >= config.max_idle_steps {
            self.status = Status::Failed;
            return None;
        }
        self.idle += 1;

        match inst {
            Inst::End => self.status = Status::Done,
            Inst::Consume(matcher) => {
                let Some(ev) = events.get(self.sp) else {
                    self.status = Status::Blocked;
                    return None;
                };
                match matcher.matches(ev) {
                    Some(payload) => {
                        self.payloads.push(payload);
                        self.idle = 0;
                        self.sp += 1;
                        self.pc += 1;
                    }
                    None => self.status = Status::Failed,
                }
            }
            Inst::Jump(lbl) => self.pc = relative(self.pc, *lbl),
            Inst::Split(lbl1, lbl2) => {
                let forked = relative(self.pc, *lbl2);
                self.pc = relative(self.pc, *lbl1);
                return Some(forked);
            }
            Inst::CapStart => {
                self.caps.push(self.sp);
                self.pc += 1;
            }
            Inst::CapEnd(template) => {
                self.close_capture(template, config.capture_style);
                self.pc += 1;
            }
            Inst::Call(addr) => {
                if self.returns.len() >= config.max_call_depth {
                    self.status = Status::Failed;
                    return None;
                }
                self.returns.push(self.pc + 1);
                self.pc = *addr;
            }
            Inst::Return => match self.returns.pop() {
                Some(addr) => self.pc = addr,
                None => self.status = Status::Done,
            },
        }
        None
    }

    fn close_capture(&mut self, template: &str, style: CaptureStyle) {
        // captures are balanced by construction
        let start = self.caps.pop().unwrap_or(self.sp);
        let (n, uses_arg0) = nargs(template);

        let mut args = Vec::with_capacity(n.max(1));
        if uses_arg0 {
            let value = self.span_value(start);
            let token = match style {
                CaptureStyle::Inline => value.to_text(),
                CaptureStyle::Reference => format!("${}", self.vars.len()),
            };
            self.vars.push(value);
            args.push(token);
        } else {
            args.push(String::new());
        }

        // nested captures that completed inside this one become $1..
        let mut nested = Vec::new();
        for _ in 1..n {
            match self.results.pop() {
                Some(r) => nested.push(r),
                None => break,
            }
        }
        nested.reverse();
        args.extend(nested);

        self.results.push(expand(template, &args));
    }

    // A single event keeps its own payload; longer spans are joined as text.
    fn span_value(&self, start: usize) -> Value {
        let count = self.sp - start;
        if count == 1 {
            return self.payloads.peek().cloned().unwrap_or(Value::Empty);
        }
        let mut span: Vec<&Value> = self.payloads.iter().take(count).collect();
        span.reverse();
        let mut text = String::new();
        for value in span {
            value.write_text(&mut text);
        }
        Value::Text(text)
    }

    /// The command and variables of a finished machine. The command is the
    /// outermost capture to complete first, or empty when nothing was captured.
    pub fn action(&self) -> (String, Vec<Value>) {
        let command = self.results.iter().last().cloned().unwrap_or_default();
        (command, self.vars.to_vec())
    }
}

fn relative(pc: InstPtr, offset: isize) -> InstPtr {
    // a target below zero is out of range, which ends the branch
    pc.checked_add_signed(offset).unwrap_or(InstPtr::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::key::KeyEvent;

    fn consume(c: char) -> Inst {
        Inst::Consume(Event::key(KeyEvent::char(c)))
    }

    fn digit() -> Inst {
        Inst::Consume(Event::RuneRange {
            low: '0',
            high: '9',
        })
    }

    fn keys(s: &str) -> Vec<InputEvent> {
        s.chars().map(InputEvent::char).collect()
    }

    fn run(m: &mut Machine, prog: &Program, events: &[InputEvent]) {
        let config = Config::default();
        while m.status() == Status::Running {
            assert!(m.step(prog, events, &config).is_none(), "unexpected split");
        }
    }

    #[test]
    fn consume_blocks_fails_and_advances() {
        let prog = Program::new(vec![consume('a'), Inst::End]);
        let config = Config::default();

        let mut m = Machine::new();
        m.step(&prog, &[], &config);
        assert_eq!(m.status(), Status::Blocked);
        assert_eq!((m.pc(), m.sp()), (0, 0));

        let mut m = Machine::new();
        m.step(&prog, &keys("b"), &config);
        assert_eq!(m.status(), Status::Failed);

        let mut m = Machine::new();
        m.step(&prog, &keys("a"), &config);
        assert_eq!((m.pc(), m.sp(), m.status()), (1, 1, Status::Running));
    }

    #[test]
    fn split_returns_fork_target() {
        let prog = Program::new(vec![Inst::Split(1, 3), consume('a'), Inst::Jump(-2), Inst::End]);
        let mut m = Machine::new();
        let fork = m.step(&prog, &[], &Config::default());
        assert_eq!(fork, Some(3));
        assert_eq!(m.pc(), 1);
        assert_eq!(m.fork(3).pc(), 3);
    }

    #[test]
    fn end_succeeds_with_unconsumed_events() {
        let prog = Program::new(vec![consume('a'), Inst::End]);
        let mut m = Machine::new();
        run(&mut m, &prog, &keys("abc"));
        assert_eq!(m.status(), Status::Done);
        assert_eq!(m.sp(), 1);
    }

    #[test]
    fn falling_off_the_program_succeeds() {
        let prog = Program::new(vec![consume('a')]);
        let mut m = Machine::new();
        run(&mut m, &prog, &keys("a"));
        assert_eq!(m.status(), Status::Done);
    }

    #[test]
    fn nested_capture_feeds_outer_template() {
        // {{[0-9][0-9]}'$0' G}'goto $1'
        let prog = Program::new(vec![
            Inst::CapStart,
            Inst::CapStart,
            digit(),
            digit(),
            Inst::CapEnd("$0".to_string()),
            consume('G'),
            Inst::CapEnd("goto $1".to_string()),
            Inst::End,
        ]);
        let mut m = Machine::new();
        run(&mut m, &prog, &keys("25G"));
        assert_eq!(m.status(), Status::Done);
        let (cmd, vars) = m.action();
        assert_eq!(cmd, "goto 25");
        assert_eq!(vars, vec![Value::Text("25".to_string())]);
    }

    #[test]
    fn reference_style_names_the_variable() {
        let prog = Program::new(vec![
            Inst::CapStart,
            consume('x'),
            Inst::CapEnd("put $0".to_string()),
        ]);
        let config = Config {
            capture_style: CaptureStyle::Reference,
            ..Config::default()
        };
        let mut m = Machine::new();
        let events = keys("x");
        while m.status() == Status::Running {
            m.step(&prog, &events, &config);
        }
        assert_eq!(m.action(), ("put $0".to_string(), vec![Value::Rune('x')]));
    }

    #[test]
    fn call_and_return() {
        let prog = Program::new(vec![Inst::Call(2), Inst::End, consume('w'), Inst::Return]);
        let mut m = Machine::new();
        run(&mut m, &prog, &keys("w"));
        assert_eq!((m.status(), m.pc(), m.sp()), (Status::Done, 1, 1));
    }

    #[test]
    fn runaway_recursion_fails() {
        let prog = Program::new(vec![Inst::Call(0)]);
        let mut m = Machine::new();
        run(&mut m, &prog, &[]);
        assert_eq!(m.status(), Status::Failed);
    }

    #[test]
    fn idle_loop_fails() {
        let prog = Program::new(vec![Inst::Jump(0)]);
        let config = Config {
            max_idle_steps: 5,
            ..Config::default()
        };
        let mut m = Machine::new();
        let mut steps = 0;
        while m.status() == Status::Running {
            m.step(&prog, &[], &config);
            steps += 1;
        }
        assert_eq!(m.status(), Status::Failed);
        assert_eq!(steps, 6);
    }

    #[test]
    fn forks_do_not_share_state() {
        let prog = Program::new(vec![
            Inst::CapStart,
            Inst::Consume(Event::any_rune()),
            Inst::CapEnd("$0".to_string()),
        ]);
        let config = Config::default();
        let events = keys("q");
        let mut a = Machine::new();
        a.step(&prog, &events, &config);
        let mut b = a.fork(a.pc());
        while a.status() == Status::Running {
            a.step(&prog, &events, &config);
        }
        assert_eq!(a.action().1, vec![Value::Rune('q')]);
        assert_eq!(b.action(), (String::new(), vec![]));
        b.step(&prog, &events, &config);
        assert_eq!(b.sp(), 1);
    }
}
