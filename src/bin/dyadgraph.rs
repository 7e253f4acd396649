//! DyadGraph CLI
//!
//! Command-line interface for dyad inference, threshold sweeps, and
//! consistency checking over turtle graph files.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use dyadgraph::inference::export_csv;
use dyadgraph::{ConsistencyChecker, DyadRuleEngine, GraphStore, Score, ThresholdSweepAnalyzer};

#[derive(Parser)]
#[command(name = "dyadgraph")]
#[command(about = "DyadGraph - Emotion-Evidence Dyad Inference", long_about = None)]
struct Cli {
    /// Input graph (turtle)
    #[arg(short, long, default_value = "data/sample.ttl")]
    data: PathBuf,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer dyads and materialize them with provenance
    Infer {
        /// Inference threshold
        #[arg(long, default_value = "0.4")]
        th: Score,

        /// Where to write the enriched graph
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Re-run the dyad rule across many thresholds (read-only)
    Sweep {
        /// Comma-separated threshold list
        #[arg(long, default_value = "0.3,0.4,0.5,0.6")]
        thresholds: String,

        /// Write aggregate results as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the per-situation breakdown
        #[arg(long)]
        detailed: bool,
    },

    /// Run consistency checks and the competency query battery
    Qa {
        /// Write the full report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut graph = GraphStore::load(&cli.data)
        .with_context(|| format!("failed to load graph from {:?}", cli.data))?;
    info!(triples = graph.len(), "loaded graph");

    match cli.command {
        Commands::Infer { th, out } => {
            let engine = DyadRuleEngine::standard();
            let summary = engine.run(&mut graph, th)?;

            println!("Inference at threshold {th}");
            println!("{:<12} {}", "situations:", summary.situations());
            println!("{:<12} {}", "dyads:", summary.total_dyads());
            println!("{:<12} {}", "new triples:", summary.new_triples);
            for (situation, dyads) in &summary.by_situation {
                let labels: Vec<&str> = dyads.iter().map(|d| d.as_str()).collect();
                println!("  {situation}: {}", labels.join(", "));
            }

            if let Some(out) = out {
                graph
                    .write(&out)
                    .with_context(|| format!("failed to write {out:?}"))?;
                println!("✓ Wrote enriched graph to {out:?}");
            }
        }

        Commands::Sweep {
            thresholds,
            csv,
            detailed,
        } => {
            let thresholds = parse_thresholds(&thresholds)?;
            let analyzer = ThresholdSweepAnalyzer::new(DyadRuleEngine::standard());
            let points = analyzer.sweep(&graph, &thresholds)?;

            println!(
                "{:<10} {:>10} {:>8} {:>12} {:>12}",
                "threshold", "with_dyad", "dyads", "pct", "mean_score"
            );
            for p in &points {
                let mean = p
                    .mean_dyad_score()
                    .map_or_else(|| "-".to_string(), |d| d.round_dp(4).to_string());
                println!(
                    "{:<10} {:>10} {:>8} {:>11}% {:>12}",
                    p.threshold.to_string(),
                    p.situations_with_dyad,
                    p.total_dyads,
                    p.pct_with_dyad().round_dp(2),
                    mean
                );
            }

            if detailed {
                for row in analyzer.breakdown(&graph, &thresholds)? {
                    println!("\n{}", row.situation);
                    for (threshold, dyads) in &row.per_threshold {
                        let labels: Vec<String> = dyads
                            .iter()
                            .map(|(e, s)| format!("{e}({s})"))
                            .collect();
                        println!("  T={threshold}: {}", labels.join(", "));
                    }
                }
            }

            if let Some(path) = csv {
                let file =
                    File::create(&path).with_context(|| format!("failed to create {path:?}"))?;
                export_csv(&points, file)?;
                println!("✓ Wrote CSV to {path:?}");
            }
        }

        Commands::Qa { report } => {
            let checker = ConsistencyChecker::new();
            let qa = checker.check(&graph, None, None)?;

            println!("QA report ({} triples)", qa.total_triples);
            println!(
                "  queries:      {}/{} pass",
                qa.competency_queries.n_pass, qa.competency_queries.n_total
            );
            for q in &qa.competency_queries.queries {
                let mark = if q.passed { "✓" } else { "✗" };
                println!("    {mark} {:<28} rows={}", q.name, q.rows);
            }
            println!(
                "  completeness: {}/{} ({})",
                qa.completeness.n_complete,
                qa.completeness.n_dyad_evidence,
                qa.completeness.completeness_rate
            );
            println!(
                "  soundness:    {}/{} ({})",
                qa.soundness.n_sound, qa.soundness.n_checked, qa.soundness.soundness_rate
            );
            match &qa.shape {
                Some(shape) => println!(
                    "  shape:        conforms={} violations/1k={}",
                    shape.conforms, shape.violations_per_1k_triples
                ),
                None => println!("  shape:        unavailable"),
            }

            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&qa)?;
                let mut file =
                    File::create(&path).with_context(|| format!("failed to create {path:?}"))?;
                file.write_all(json.as_bytes())?;
                println!("✓ Wrote report to {path:?}");
            }

            if !qa.all_pass() {
                anyhow::bail!("consistency checks failed");
            }
        }
    }

    Ok(())
}

fn parse_thresholds(raw: &str) -> Result<Vec<Score>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Score>()
                .with_context(|| format!("bad threshold '{s}'"))
        })
        .collect()
}
