#![no_main]
use libfuzzer_sys::fuzz_target;
use step_tools::{StepFile, TreeBuilder};

/// Fuzz record deserialization followed by tree construction.
///
/// Arbitrary JSON may reference unknown parts, repeat step ids or contain
/// cycles; building must report those as errors, never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(file) = serde_json::from_slice::<StepFile>(data) {
        let _ = TreeBuilder::new().build_file(Some(&file));
    }
});
