//! FastGeneviz CLI entry point
//!
//! Lays out annotation tracks over genomic regions and writes the shapes
//! as tab-separated text.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fast_geneviz::core::{Orientation, Region};
use fast_geneviz::formats;
use fast_geneviz::tracks::{
    layout_regions, BatchOptions, Collapse, CoverageTrack, CoverageTrackConfig, FeatureSet,
    FeatureTrack, FeatureTrackConfig, GeneTrack, GeneTrackConfig, Track,
};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// How gene tracks combine transcripts (CLI enum)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CollapseArg {
    /// One body per gene
    #[value(name = "gene")]
    Gene,
    /// One merged transcript per gene
    #[value(name = "transcript")]
    Transcript,
}

impl From<CollapseArg> for Collapse {
    fn from(arg: CollapseArg) -> Self {
        match arg {
            CollapseArg::Gene => Collapse::Gene,
            CollapseArg::Transcript => Collapse::Transcript,
        }
    }
}

#[derive(Parser)]
#[command(name = "fast-geneviz")]
#[command(about = "Stacked layout of genomic annotation tracks")]
#[command(version)]
#[command(author = "FastGeneviz Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the layout subcommands
#[derive(Args)]
struct LayoutArgs {
    /// Region to lay out (chr:start-end), may be repeated
    #[arg(short = 'r', long = "region", required = true)]
    regions: Vec<Region>,
    /// Output file (optional, stdout if not specified)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
    /// Attribute used to color features
    #[arg(long)]
    hue: Option<String>,
    /// Vertical gap between levels
    #[arg(long, default_value = "0.05")]
    spacing: f64,
    /// Lay out for a reversed genomic axis
    #[arg(long)]
    reverse: bool,
    /// Characters across the plot used to size labels (0: labels take no space)
    #[arg(long, default_value = "100")]
    label_columns: f64,
    /// Number of threads (default: number of CPUs)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,
}

impl LayoutArgs {
    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            orientation: if self.reverse {
                Orientation::Reversed
            } else {
                Orientation::Forward
            },
            label_columns: (self.label_columns > 0.0).then_some(self.label_columns),
            threads: self.threads,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out features from a BED file
    Features {
        /// Input BED file (plain, gzip or bzip2)
        input: PathBuf,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Attribute joining features into groups (e.g. name)
        #[arg(long)]
        group: Option<String>,
        /// Attribute drawn as label
        #[arg(long)]
        label: Option<String>,
        /// Feature height
        #[arg(long, default_value = "1.0")]
        height: f64,
        /// Draw boxes with strand-bent junctions instead of arrows
        #[arg(long)]
        strand_junctions: bool,
        /// Split BED12 records into one feature per block
        #[arg(long)]
        blocks: bool,
    },
    /// Lay out genes/transcripts from a GTF/GFF file
    Genes {
        /// Input GTF/GFF file (plain, gzip or bzip2)
        input: PathBuf,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Combine transcripts per gene
        #[arg(long)]
        collapse: Option<CollapseArg>,
        /// Gene identifier attribute
        #[arg(long, default_value = "gene_id")]
        gene_id: String,
        /// Transcript identifier attribute
        #[arg(long, default_value = "transcript_id")]
        transcript_id: String,
        /// Exon height
        #[arg(long, default_value = "0.9")]
        height: f64,
    },
    /// Per-base read depth from a BED file of aligned reads
    Coverage {
        /// Input BED file of reads (BED12 blocks are counted separately)
        input: PathBuf,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Track height
        #[arg(long, default_value = "1.0")]
        height: f64,
        /// Draw the outline only
        #[arg(long)]
        no_fill: bool,
    },
    /// Merge overlapping intervals of a BED file per chromosome
    Merge {
        /// Input BED file (plain, gzip or bzip2)
        input: PathBuf,
        /// Output file (optional, stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::with_capacity(
            128 * 1024,
            std::fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    })
}

fn run_layout<T: Track + Sync>(track: &T, args: &LayoutArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let layouts = layout_regions(track, &args.regions, &args.batch_options())?;

    let mut out = open_output(args.output.as_deref())?;
    for (region, layout) in args.regions.iter().zip(&layouts) {
        formats::write_layout(&mut out, region, layout)?;
    }
    out.flush()?;

    eprintln!("\n=== Layout Statistics ===");
    eprintln!("Regions:         {}", layouts.len());
    eprintln!("Shapes:          {}", layouts.iter().map(|l| l.shapes.len()).sum::<usize>());
    eprintln!("Labels:          {}", layouts.iter().map(|l| l.labels.len()).sum::<usize>());
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Features {
            input,
            layout,
            group,
            label,
            height,
            strand_junctions,
            blocks,
        } => {
            eprintln!("Loading BED file: {:?}", input);
            let records = formats::read_bed_file(&input, blocks)
                .with_context(|| format!("Failed to read {:?}", input))?;
            eprintln!("Loaded {} features", records.len());

            let track = FeatureTrack::new(
                FeatureSet::new(records),
                FeatureTrackConfig {
                    group,
                    label,
                    hue: layout.hue.clone(),
                    strand_junctions,
                    height,
                    spacing: layout.spacing,
                    ..Default::default()
                },
            );
            run_layout(&track, &layout)?;
        }

        Commands::Genes {
            input,
            layout,
            collapse,
            gene_id,
            transcript_id,
            height,
        } => {
            eprintln!("Loading GTF file: {:?}", input);
            let records = formats::read_gtf_file(&input, Some("exon"))
                .with_context(|| format!("Failed to read {:?}", input))?;
            eprintln!("Loaded {} exons", records.len());

            let track = GeneTrack::new(
                FeatureSet::new(records),
                GeneTrackConfig {
                    gene_id,
                    transcript_id,
                    collapse: collapse.map(Into::into),
                    hue: layout.hue.clone(),
                    height,
                    spacing: layout.spacing,
                    ..Default::default()
                },
            );
            run_layout(&track, &layout)?;
        }

        Commands::Coverage {
            input,
            layout,
            height,
            no_fill,
        } => {
            eprintln!("Loading reads: {:?}", input);
            let records = formats::read_bed_file(&input, true)
                .with_context(|| format!("Failed to read {:?}", input))?;
            eprintln!("Loaded {} aligned blocks", records.len());

            let track = CoverageTrack::new(
                FeatureSet::new(records),
                CoverageTrackConfig {
                    height,
                    fill: !no_fill,
                    ..Default::default()
                },
            );
            run_layout(&track, &layout)?;
        }

        Commands::Merge { input, output } => {
            let start = Instant::now();
            eprintln!("Merging BED file: {:?}", input);
            let records = formats::read_bed_file(&input, false)
                .with_context(|| format!("Failed to read {:?}", input))?;
            let merged = formats::merge_records(&records);

            let mut out = open_output(output.as_deref())?;
            formats::write_bed3(&mut out, &merged)?;
            out.flush()?;

            eprintln!("\n=== Merge Statistics ===");
            eprintln!("Input records:   {}", records.len());
            eprintln!("Merged records:  {}", merged.len());
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
