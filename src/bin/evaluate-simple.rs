/// Evaluate the stateless baseline predictors against one or more traces.

use std::env;
use synapse::stats::TraceStats;
use synapse::*;

fn run_test(records: &[BranchRecord], p: impl SimplePredictor) {
    let mut stat = TraceStats::new();

    for record in records.iter().filter(|r| r.is_conditional()) {
        stat.record(record.pc, p.predict(), record.outcome());
    }

    println!(
        "  {:20} Global hit rate: {}/{} ({:.2}% correct) ({} misses)",
        p.name(),
        stat.global_hits(),
        stat.global_brns(),
        stat.hit_rate() * 100.0,
        stat.global_miss()
    );
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("usage: {} <trace files>", args[0]);
        return;
    }
    let traces = BinaryTraceSet::new_from_slice(&args[1..]);

    for trace in traces {
        if trace.num_entries() < 100 {
            continue;
        }
        println!("[*] {}", trace.name());
        let records = trace.as_slice();
        run_test(records, RandomPredictor);
        run_test(records, TakenPredictor);
        run_test(records, NotTakenPredictor);
    }
}
