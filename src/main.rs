//! UniversalHash Nonce Benchmark CLI
//!
//! Hashes nonces `0..N` of a block template on `T` threads and prints the
//! XOR fingerprint of all results together with the hash rate.

use clap::Parser;
use log::warn;
use tracing_subscriber::EnvFilter;

use uhash_bench::cli::BenchArgs;
use uhash_bench::parity::check_profile_parity;
use uhash_bench::{run, WorkTemplate};
use uhash_core::SharedState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = BenchArgs::parse();

    if let Err(e) = cmd_bench(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_bench(args: &BenchArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;

    let cpus = num_cpus::get();
    if config.threads > cpus {
        warn!(
            "{} threads requested but only {} logical CPUs are available",
            config.threads, cpus
        );
    }

    if !args.json {
        println!("=== UniversalHash Nonce Benchmark ===");
        println!("Profile:  {}", config.engine.profile);
        println!("Mode:     {}", config.strategy);
        println!("Threads:  {} ({} CPUs)", config.threads, cpus);
        if config.affinity != 0 {
            println!("Affinity: {:#x}", config.affinity);
        }
        println!(
            "Init:     {} thread(s), {} kernel",
            config.init_threads, config.engine.init_kernel
        );
        println!(
            "AES:      {}",
            if config.engine.soft_aes { "software" } else { "hardware" }
        );
        println!("Nonces:   {}", config.nonces);
        println!("Seed:     {}", config.seed);
        println!("=====================================\n");
    }

    let report = run::<SharedState>(config.clone())?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("Calculated result: {}", report.fingerprint);
        println!("Hashes:            {}", report.hashes);
        println!("Time elapsed:      {:.3}s", report.elapsed.as_secs_f64());
        println!("Performance:       {:.2} hashes per second", report.hashrate());
    }

    if args.check {
        let parity = check_profile_parity::<SharedState>(&config, &WorkTemplate::default())?;
        if !parity.matches() {
            anyhow::bail!(
                "light and full profiles disagree: {} vs {}",
                hex::encode(parity.light),
                hex::encode(parity.full)
            );
        }
        if !args.json {
            println!("Profile check:     light and full agree");
        }
    }

    if let Some(expected) = &args.expect {
        report.verify(expected)?;
        if !args.json {
            println!("Fingerprint:       verified");
        }
    }

    Ok(())
}
