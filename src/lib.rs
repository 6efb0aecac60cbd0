pub mod codec;
mod compile;
pub mod config;
pub mod error;
pub mod event;
pub mod expand;
pub mod key;
pub mod machine;
pub mod pattern;
pub mod program;
mod stack;
pub mod syntax;
#[cfg(feature = "crossterm")]
pub mod term;
pub mod vm;

pub use crate::config::{CaptureStyle, CodecConfig, Config};
pub use crate::error::{CompileError, Error, Result};
pub use crate::event::{Event, RuneSet, Value};
pub use crate::key::{InputEvent, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent};
pub use crate::machine::Status;
pub use crate::pattern::{Grammar, Pattern};
pub use crate::program::{Inst, InstPtr, Program};
pub use crate::vm::{Action, ExecResult, MachineSnapshot, Vm, VmBuilder, VmSnapshot};
