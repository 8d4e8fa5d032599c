//! Observability utilities: fault guards, span timing, subscriber setup.

mod guard;
mod logging;
mod timer;

pub use guard::{guarded, guarded_with};
pub use logging::{init_tracing, LogFormat};
pub use timer::SpanTimer;
