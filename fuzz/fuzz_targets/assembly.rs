#![no_main]

use jitscope::assembly::AssemblyProcessor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut processor = AssemblyProcessor::new();
    for line in text.lines() {
        processor.process_line(line);
    }
    let _ = processor.finish();
});
