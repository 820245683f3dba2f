mod ctx;
mod history;
pub mod roller;
mod store;
mod value;

pub use ctx::{DefaultRoller, Evaluation, Session};
pub use history::{FunctionHistory, HistoryEntry};
pub use roller::{Randomizer, ScriptedRoller};
pub use store::{positional_index, FunctionLoader, MemoryLoader, SavedFunctions};
pub use value::{Number, Value};
