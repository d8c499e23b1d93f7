//! Station timetables. A program belongs to one station and one day type and
//! occupies a `[start, end)` window of the day; `end <= start` means the
//! window runs past midnight.

mod models;
mod on_air;
mod storage;

pub use models::{
    ImagePayload, NormalizedProgramFilter, Program, ProgramFilter, ProgramPayload, ProgramRecord,
};
pub use on_air::on_air;
pub use storage::{ImportOutcome, ProgramStorage};
