//! OS input boundary: simulated key/mouse events, global hotkeys and the
//! game process check

pub mod hotkeys;
pub mod injector;
pub mod process;

pub use injector::{EnigoSink, InputSink, LogSink};
pub use process::{AlwaysRunning, ProcessProbe, SysinfoProbe};
