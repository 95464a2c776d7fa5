use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_trajectory::archive::{
    DnaMoleculeArchive, LoadedArchive, SingleMoleculeArchive, ValidationStatus, describe_archives,
};
use kira_trajectory::cli::{Cli, ColumnArg, Commands, KindArg, parse_labels};
use kira_trajectory::ctx::Ctx;
use kira_trajectory::io;
use kira_trajectory::pipeline::Pipeline;
use kira_trajectory::pipeline::stage1_load::Stage1Load;
use kira_trajectory::pipeline::stage2_validate::Stage2Validate;
use kira_trajectory::schema::v1::ArchiveKind;
use kira_trajectory::segments::{PauseParams, PauseThreshold, SegmentColumn};
use kira_trajectory::source::ArchiveSource;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            init_threads(args.threads)?;
            let labels = parse_labels(&args.labels)?;
            let threshold = if args.adaptive {
                PauseThreshold::Adaptive(args.threshold)
            } else {
                PauseThreshold::Fixed(args.threshold)
            };
            let pause = PauseParams {
                threshold,
                min_duration: args.min_duration,
                column: column_from_arg(args.column),
            };

            let mut ctx = Ctx::new(
                args.archive,
                args.out,
                kind_from_arg(args.kind),
                args.accept_tag,
                labels,
                pause,
                args.json,
                args.tsv,
                env!("CARGO_PKG_VERSION"),
            );
            ctx.sigma = args.sigma;
            ctx.threads = args.threads;

            Pipeline::full().run(&mut ctx)?;
            print_summary(&ctx)?;
        }
        Commands::Validate(args) => {
            let labels = parse_labels(&args.labels)?;
            let mut ctx = Ctx::new(
                args.archive,
                PathBuf::from("."),
                kind_from_arg(args.kind),
                args.accept_tag,
                labels,
                PauseParams::default(),
                false,
                false,
                env!("CARGO_PKG_VERSION"),
            );

            let pipeline = Pipeline::new(vec![
                Box::new(Stage1Load::new()),
                Box::new(Stage2Validate::new()),
            ]);
            pipeline.run(&mut ctx)?;
            print_validate_summary(&ctx)?;
        }
        Commands::Describe(args) => {
            let labels = parse_labels(&args.labels)?;
            let mut loaded = Vec::with_capacity(args.archive.len());
            for location in &args.archive {
                let source = ArchiveSource::open(location)
                    .with_context(|| format!("failed to open archive {}", location))?;
                let archive = match args.kind {
                    KindArg::Dna => LoadedArchive::Dna(DnaMoleculeArchive::load(
                        &source,
                        &args.accept_tag,
                        labels.clone(),
                    )?),
                    KindArg::Single => LoadedArchive::Single(SingleMoleculeArchive::load(
                        &source,
                        &args.accept_tag,
                        labels.clone(),
                    )?),
                };
                loaded.push(archive);
            }
            let archives: Vec<_> = loaded.iter().map(|a| a.as_archive()).collect();
            print!("{}", io::describe::format_describe(&describe_archives(&archives)));
        }
    }

    Ok(())
}

fn kind_from_arg(kind: KindArg) -> ArchiveKind {
    match kind {
        KindArg::Dna => ArchiveKind::Dna,
        KindArg::Single => ArchiveKind::Single,
    }
}

fn column_from_arg(column: ColumnArg) -> SegmentColumn {
    match column {
        ColumnArg::A => SegmentColumn::A,
        ColumnArg::SigmaA => SegmentColumn::SigmaA,
        ColumnArg::B => SegmentColumn::B,
        ColumnArg::SigmaB => SegmentColumn::SigmaB,
    }
}

#[cfg(feature = "mt")]
fn init_threads(threads: usize) -> Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
    }
    Ok(())
}

#[cfg(not(feature = "mt"))]
fn init_threads(threads: usize) -> Result<()> {
    if threads > 1 {
        tracing::warn!(threads, "built without mt feature; running single-threaded");
    }
    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    print_warnings(ctx);
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) -> Result<()> {
    let archive = ctx.archive()?.as_archive();
    if let Some(ValidationStatus::Failed(err)) = &ctx.validation {
        anyhow::bail!("archive {} failed validation: {}", archive.name(), err);
    }
    println!("kira-trajectory validate ok");
    println!("datasets: {}", archive.metadata_count());
    println!("molecules: {}", archive.len());
    print_warnings(ctx);
    Ok(())
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
