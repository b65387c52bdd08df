#![no_main]

use goal_compare::problem::ApiProblem;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Error bodies come straight off the wire; parsing must never panic
    if let Ok(body) = std::str::from_utf8(data) {
        if let Some(problem) = ApiProblem::parse(body) {
            let _ = problem.kind();
        }
    }
});
