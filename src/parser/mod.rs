//! Markup compilation: scanning, URL detection, event definitions, and the
//! recursive compiler itself.

mod compile;
mod event;
mod scanner;
mod url;

pub use compile::Parser;
