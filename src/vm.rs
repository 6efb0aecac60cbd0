use crate::config::{CaptureStyle, CodecConfig, Config};
use crate::event::Value;
use crate::key::InputEvent;
use crate::machine::{Machine, Status};
use crate::program::{InstPtr, Program};

/// A command produced by a completed match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Action {
    /// The expanded template of the outermost capture.
    pub command: String,
    /// Values captured through `$0`, in the order they were captured.
    pub vars: Vec<Value>,
}

/// Outcome of feeding one event to the [`Vm`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// The command to run now, if a branch completed.
    pub action: Option<Action>,
    /// Whether more events could still complete a command. When false the
    /// caller must [`Vm::reset`] before feeding more events.
    pub may_continue: bool,
}

impl ExecResult {
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }
}

/// Incremental matcher running a compiled [`Program`] against input events.
#[derive(Debug, Clone)]
pub struct Vm {
    program: Program,
    config: Config,
    machines: Vec<Machine>,
    events: Vec<InputEvent>,
}

/// Position and state of one live branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineSnapshot {
    pub pc: InstPtr,
    pub sp: usize,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmSnapshot {
    /// Events seen since the last reset.
    pub buffered: usize,
    pub machines: Vec<MachineSnapshot>,
}

pub struct VmBuilder {
    program: Program,
    config: Config,
}

impl VmBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn capture_style(mut self, style: CaptureStyle) -> Self {
        self.config.capture_style = style;
        self
    }

    pub fn codec(mut self, codec: CodecConfig) -> Self {
        self.config.codec = codec;
        self
    }

    pub fn max_machines(mut self, max: usize) -> Self {
        self.config.max_machines = max.max(1);
        self
    }

    pub fn max_call_depth(mut self, max: usize) -> Self {
        self.config.max_call_depth = max;
        self
    }

    pub fn max_idle_steps(mut self, max: usize) -> Self {
        self.config.max_idle_steps = max;
        self
    }

    pub fn build(self) -> Vm {
        Vm {
            program: self.program,
            config: self.config,
            machines: vec![Machine::new()],
            events: Vec::new(),
        }
    }
}

impl Vm {
    pub fn new(program: Program) -> Self {
        Self::builder(program).build()
    }

    pub fn builder(program: Program) -> VmBuilder {
        VmBuilder {
            program,
            config: Config::default(),
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> VmSnapshot {
        VmSnapshot {
            buffered: self.events.len(),
            machines: self
                .machines
                .iter()
                .map(|m| MachineSnapshot {
                    pc: m.pc(),
                    sp: m.sp(),
                    status: m.status(),
                })
                .collect(),
        }
    }

    /// Drops every branch and buffered event, starting over at address 0.
    pub fn reset(&mut self) {
        tracing::debug!(target: "keygrammar::vm", buffered = self.events.len(), "reset");
        self.machines.clear();
        self.machines.push(Machine::new());
        self.events.clear();
    }

    /// Feeds the next event and runs every branch until all of them are either
    /// finished or waiting for more input.
    ///
    /// At most one action is reported. When several branches complete during
    /// the same call, the one finishing last in scheduling order wins.
    pub fn exec(&mut self, event: InputEvent) -> ExecResult {
        self.events.push(event);
        let mut action = None;

        loop {
            let mut i = 0;
            while i < self.machines.len() {
                if self.machines[i].status() == Status::Blocked {
                    i += 1;
                    continue;
                }
                if let Some(pc) = self.machines[i].step(&self.program, &self.events, &self.config) {
                    if self.machines.len() < self.config.max_machines {
                        let forked = self.machines[i].fork(pc);
                        self.machines.push(forked);
                    } else {
                        tracing::warn!(
                            target: "keygrammar::vm",
                            pc,
                            max = self.config.max_machines,
                            "branch limit reached, dropping fork"
                        );
                    }
                }
                match self.machines[i].status() {
                    Status::Done => {
                        let (command, vars) = self.machines.swap_remove(i).action();
                        action = Some(Action { command, vars });
                    }
                    Status::Failed => {
                        self.machines.swap_remove(i);
                    }
                    Status::Running | Status::Blocked => i += 1,
                }
            }
            tracing::trace!(
                target: "keygrammar::vm",
                live = self.machines.len(),
                buffered = self.events.len(),
                "pass complete"
            );
            if self.machines.iter().all(|m| m.status() == Status::Blocked) {
                break;
            }
        }

        for m in &mut self.machines {
            m.unblock();
        }
        if let Some(action) = &action {
            tracing::debug!(target: "keygrammar::vm", command = %action.command, vars = action.vars.len(), "matched");
        }
        ExecResult {
            action,
            may_continue: !self.machines.is_empty(),
        }
    }
}
