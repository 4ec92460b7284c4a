use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sigvival::cli::{Cli, Commands, RunArgs};
use sigvival::ctx::Ctx;
use sigvival::geneset;
use sigvival::io;
use sigvival::reference::ReferenceCache;
use sigvival::request::AnalysisRequest;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cache = ReferenceCache::new();

    match cli.command {
        Commands::Run(args) => {
            let ctx = run(args, &cache)?;
            print_summary(&ctx)?;
            if let Some(err) = ctx.export_error {
                return Err(err.into());
            }
        }
        Commands::Cohorts(args) => {
            let config = args.load_config()?;
            let reference = cache.get_or_load(&config.data)?;
            for cohort in &reference.cohorts {
                let samples = reference.samples_in_cohort(cohort).count();
                println!("{}\t{}", cohort, samples);
            }
        }
        Commands::Genes(args) => {
            let config = args.data.load_config()?;
            let reference = cache.get_or_load(&config.data)?;
            let needle = args.filter.as_deref().map(str::to_ascii_lowercase);
            for gene in &reference.genes {
                let keep = needle
                    .as_deref()
                    .is_none_or(|n| gene.to_ascii_lowercase().contains(n));
                if keep {
                    println!("{}", gene);
                }
            }
        }
        Commands::Validate(args) => {
            let config = args.load_config()?;
            let reference = cache.get_or_load(&config.data)?;
            println!("sigvival validate ok");
            println!("data: {}", config.data.dir.display());
            println!("genes: {}", reference.genes.len());
            println!("cohorts: {}", reference.cohorts.len());
            println!("samples: {}", reference.samples.len());
            print_warnings(&reference.warnings);
        }
    }

    Ok(())
}

fn run(args: RunArgs, cache: &ReferenceCache) -> Result<Ctx> {
    let config = args.load_config()?;

    let mut genes = args.genes.clone();
    let mut name = args.signature.trim().to_string();
    if let Some(path) = &args.genes_file {
        let explicit = (!name.is_empty()).then_some(name.as_str());
        let from_file = geneset::load_signature_file(path, explicit)?;
        name = from_file.name;
        genes.extend(from_file.genes);
    }
    let request = AnalysisRequest::new(name, genes, args.cohorts.clone(), args.cut_point)?;

    let reference = cache.get_or_load(&config.data)?;
    sigvival::run_analysis(request, reference, config, !args.no_export)
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    print_warnings(&ctx.warnings);
    Ok(())
}

fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
}
