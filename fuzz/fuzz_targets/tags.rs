#![no_main]

use jitscope::{compile::CompileChainWalker, diagnostics::Diagnostics, session::LogSession};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let diagnostics = Diagnostics::new();
    let mut session = LogSession::new(&diagnostics);
    for line in text.lines() {
        session.process_tag_line(line);
    }
    let log = session.finish();

    let walker = CompileChainWalker::new(&diagnostics);
    for task in &log.tasks {
        let _ = walker.walk(task);
    }
});
