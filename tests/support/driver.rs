use keygrammar::{Action, InputEvent, Program, Vm};

/// Feeds events the way an editor's event loop would, starting over after a
/// command or whenever nothing more can match.
pub struct Driver {
    pub vm: Vm,
}

impl Driver {
    pub fn new(program: Program) -> Self {
        Self { vm: Vm::new(program) }
    }

    pub fn feed(&mut self, event: InputEvent) -> Option<Action> {
        let result = self.vm.exec(event);
        if result.has_action() || !result.may_continue {
            self.vm.reset();
        }
        result.action
    }

    /// Types every character of `keys` and returns the commands produced.
    pub fn type_keys(&mut self, keys: &str) -> Vec<String> {
        keys.chars()
            .filter_map(|c| self.feed(InputEvent::char(c)))
            .map(|action| action.command)
            .collect()
    }
}

pub fn keys(text: &str) -> Vec<InputEvent> {
    text.chars().map(InputEvent::char).collect()
}
