/// Evaluate a configured prediction scheme against one or more traces.

use std::env;
use std::time::Instant;
use synapse::stats::TraceStats;
use synapse::*;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("usage: {} <scheme> <trace files>", args[0]);
        println!("schemes: static, gshare, tournament, custom");
        return;
    }

    let scheme = match args[1].parse::<SchemeKind>() {
        Ok(scheme) => scheme,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let cfg = PredictorConfig::with_scheme(scheme);
    let mut predictor = match cfg.build() {
        Ok(predictor) => predictor,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let storage_bits = cfg.storage_bits();
    println!("[*] {} configuration:", scheme);
    println!(
        "      Storage bits: {}b, {:.2}KiB",
        storage_bits,
        storage_bits as f64 / 1024.0 / 8.0
    );

    let traces = BinaryTraceSet::new_from_slice(&args[2..]);
    for trace in traces {
        if trace.num_entries() < 100 {
            continue;
        }
        predictor.reset();
        let mut stats = TraceStats::new();

        let start = Instant::now();
        for record in trace.as_slice() {
            if record.is_conditional() {
                let predicted =
                    predictor.predict(record.pc, record.tgt, record.is_direct());
                stats.record(record.pc, predicted, record.outcome());
            }
            predictor.train(
                record.pc,
                record.tgt,
                record.outcome(),
                record.is_conditional(),
                record.is_call(),
                record.is_return(),
                record.is_direct(),
            );
        }
        let done = start.elapsed();

        println!("[*] {} ... simulated in {:.3?}", trace.name(), done);
        println!("      Unique branches: {}", stats.num_unique_branches());
        println!(
            "      Global hit rate: {}/{} ({:.2}% correct) ({} misses)",
            stats.global_hits(),
            stats.global_brns(),
            stats.hit_rate() * 100.0,
            stats.global_miss()
        );

        let low = stats.get_low_rate_branches(8);
        if !low.is_empty() {
            println!("      Low hit-rate branches:");
            for (pc, data) in low {
                println!(
                    "        {:08x} {:8}/{:8} ({:.4})",
                    pc,
                    data.hits,
                    data.occ,
                    data.hit_rate()
                );
            }
        }
    }
}
