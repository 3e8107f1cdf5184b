//! Build rule synthesis and manifest assembly.
//!
//! ```text
//! DependencyGraph
//!     │
//!     ├── every unit ──► object rule   (bin/x.o: src/x.c)
//!     ├── test units ──► link rule     (test/x: bin/x.test.o <closure>)
//!     │
//!     └── Manifest ──► preamble, all, $(TARGET), link, object, clean
//! ```

mod manifest;
mod synth;

pub use manifest::Manifest;
pub use synth::{Rule, UnitRules, link_rule, object_rule, synthesize};
