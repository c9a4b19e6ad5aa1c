use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use mapstream::{IndexOptions, StreamingMapper};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Map randomly generated reads against a FASTA reference and print
/// PAF-style hit lines plus a summary.
#[derive(Parser)]
struct Args {
    /// Reference FASTA path (gzip/zstd accepted)
    #[clap(required = true)]
    reference: PathBuf,
    /// Number of reads to generate
    #[clap(long, default_value_t = 10_000)]
    reads: usize,
    /// Read length in bases
    #[clap(long, default_value_t = 20)]
    read_len: usize,
    /// Worker pool size for the batched backend
    #[clap(long)]
    threads: Option<usize>,
    /// Cap on hits reported per read
    #[clap(long, default_value_t = 4)]
    max_hits: i64,
    /// One empty read per this many generated reads, to exercise skipping
    #[clap(long, default_value_t = 100)]
    empty_every: usize,
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut options = IndexOptions::new();
    options.set("max_hits", args.max_hits);

    let mut mapper = StreamingMapper::open(&args.reference, options)?;
    eprintln!(
        "index loaded, multithreading: {}",
        mapper.has_multithreading()
    );
    if let Some(threads) = args.threads {
        mapper.enable_threading(threads)?;
    }

    let mut rng = if let Some(seed) = args.seed {
        SmallRng::seed_from_u64(seed)
    } else {
        SmallRng::from_os_rng()
    };
    let reads: Vec<(String, Vec<u8>)> = (0..args.reads)
        .map(|i| {
            let data = if args.empty_every > 0 && i % args.empty_every == 0 {
                Vec::new()
            } else {
                (0..args.read_len)
                    .map(|_| b"ACGT"[rng.random_range(0..4)])
                    .collect()
            };
            (format!("read-{i}"), data)
        })
        .collect();

    let start = Instant::now();
    let mut with_hits = 0usize;
    for result in mapper.map_reads(reads, |data| data.clone())? {
        let mapped = result?;
        if !mapped.hits.is_empty() {
            with_hits += 1;
        }
        for hit in &mapped.hits {
            println!("{}\t{}\t{}", mapped.metadata, mapped.data.len(), hit);
        }
    }
    let elapsed = start.elapsed();

    let stats = mapper.stats();
    eprintln!(
        "mapped {} of {} reads ({} skipped) in {:.3}s ({:.1} reads/s)",
        with_hits,
        stats.seen(),
        stats.skipped(),
        elapsed.as_secs_f64(),
        stats.mapped() as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
    );
    Ok(())
}
