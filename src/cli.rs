use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kira-trajectory",
    version,
    about = "Single-molecule trajectory archives: validation, segment filtering and pause detection"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Archive snapshot (.json or .json.gz) or http(s) base URL")]
    pub archive: String,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = KindArg::Dna)]
    pub kind: KindArg,

    #[arg(long, default_value = "accept")]
    pub accept_tag: String,

    #[arg(long = "label", help = "PROTEIN=LABEL (repeatable)")]
    pub labels: Vec<String>,

    #[arg(long, help = "Drop rate segments with Sigma_B >= SIGMA")]
    pub sigma: Option<f64>,

    #[arg(long, default_value_t = 1.0, help = "Pause cutoff (divisor of the mean with --adaptive)")]
    pub threshold: f64,

    #[arg(long, default_value_t = false)]
    pub adaptive: bool,

    #[arg(long, default_value_t = 0.0, help = "Minimum pause duration (X2 - X1)")]
    pub min_duration: f64,

    #[arg(long, value_enum, default_value_t = ColumnArg::B)]
    pub column: ColumnArg,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long)]
    pub archive: String,

    #[arg(long, value_enum, default_value_t = KindArg::Dna)]
    pub kind: KindArg,

    #[arg(long, default_value = "accept")]
    pub accept_tag: String,

    #[arg(long = "label", help = "PROTEIN=LABEL (repeatable)")]
    pub labels: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    #[arg(long, num_args = 1.., help = "Archive snapshots or URLs (repeatable)")]
    pub archive: Vec<String>,

    #[arg(long, value_enum, default_value_t = KindArg::Dna)]
    pub kind: KindArg,

    #[arg(long, default_value = "accept")]
    pub accept_tag: String,

    #[arg(long = "label", help = "PROTEIN=LABEL (repeatable)")]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Dna,
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColumnArg {
    A,
    SigmaA,
    B,
    SigmaB,
}

/// Parses repeated `PROTEIN=LABEL` arguments.
pub fn parse_labels(values: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();
    for value in values {
        let (protein, label) = value
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("label '{}' is not PROTEIN=LABEL", value))?;
        if protein.is_empty() || label.is_empty() {
            anyhow::bail!("label '{}' has an empty field", value);
        }
        labels.insert(protein.to_string(), label.to_string());
    }
    Ok(labels)
}
