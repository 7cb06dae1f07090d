//! Includes the modules emitted by `build.rs`, so the generator's output is
//! type-checked against the runtime on every build.

pub mod conformance {
    include!(concat!(env!("OUT_DIR"), "/generated/conformance.rs"));
}

pub mod extras {
    include!(concat!(env!("OUT_DIR"), "/generated/extras.rs"));
}
