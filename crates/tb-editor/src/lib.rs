//! Board editor: interaction state machine, input adapters, and the
//! `BoardEditor` facade that hosts drive.

pub mod board;
pub mod commands;
pub mod input;
pub mod interaction;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use board::BoardEditor;
pub use commands::{Aim, Command};
pub use input::{InputEvent, Modifiers, PointerButton};
pub use interaction::Interaction;
pub use session::{DragMode, EntityState, Target};
pub use shortcuts::{BoardAction, ShortcutMap};
pub use tools::{InputAdapter, PointerAdapter, PointInfo, TouchAdapter};
