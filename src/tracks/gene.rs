//! Gene/transcript track
//!
//! Exons are drawn as a feature track grouped by transcript, or by gene
//! when collapsing.

use crate::core::{merge_intervals, LayoutResult, Region};
use crate::formats::FeatureRecord;
use crate::tracks::{
    ColorMap, DrawContext, FeatureSet, FeatureTrack, FeatureTrackConfig, Palette, Track,
    TrackLayout, DEFAULT_COLOR,
};
use log::debug;
use std::collections::HashMap;

/// How transcripts of a gene are combined before drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapse {
    /// One body per gene, spanning all of its exons
    Gene,
    /// One merged transcript per gene
    Transcript,
}

/// Gene track settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeneTrackConfig {
    /// Attribute holding the gene identifier
    pub gene_id: String,
    /// Attribute holding the transcript identifier
    pub transcript_id: String,
    pub collapse: Option<Collapse>,
    pub hue: Option<String>,
    pub hue_order: Option<Vec<String>>,
    pub palette: Palette,
    pub height: f64,
    pub spacing: f64,
    pub color: String,
}

impl Default for GeneTrackConfig {
    fn default() -> Self {
        Self {
            gene_id: "gene_id".to_string(),
            transcript_id: "transcript_id".to_string(),
            collapse: None,
            hue: None,
            hue_order: None,
            palette: Palette::default(),
            height: 0.9,
            spacing: 0.05,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl GeneTrackConfig {
    /// Attribute used both to group and to label exons
    pub fn group_attr(&self) -> &str {
        match self.collapse {
            None => &self.transcript_id,
            Some(_) => &self.gene_id,
        }
    }

    fn feature_config(&self) -> FeatureTrackConfig {
        let group = self.group_attr().to_string();
        FeatureTrackConfig {
            group: Some(group.clone()),
            label: Some(group),
            hue: self.hue.clone(),
            hue_order: self.hue_order.clone(),
            palette: self.palette.clone(),
            strand_junctions: true,
            height: self.height,
            spacing: self.spacing,
            color: self.color.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneTrack {
    exons: FeatureSet,
    config: GeneTrackConfig,
    color_map: ColorMap,
}

impl GeneTrack {
    pub fn new(exons: FeatureSet, config: GeneTrackConfig) -> Self {
        let color_map = match config.hue.as_deref() {
            Some(hue) => ColorMap::build(
                exons.records().iter().filter_map(|r| r.attr(hue)),
                &config.palette,
                config.hue_order.as_deref(),
            ),
            None => ColorMap::default(),
        };
        Self {
            exons,
            config,
            color_map,
        }
    }

    /// Build from GTF records, keeping exons only
    pub fn from_gtf_records(records: Vec<FeatureRecord>, config: GeneTrackConfig) -> Self {
        let exons = records
            .into_iter()
            .filter(|r| r.attr("feature").map_or(true, |f| f == "exon"))
            .collect();
        Self::new(exons, config)
    }

    pub fn config(&self) -> &GeneTrackConfig {
        &self.config
    }

    /// Exons overlapping the region, collapsed as configured
    pub fn fetch_exons(&self, region: &Region) -> Vec<FeatureRecord> {
        let exons = self.exons.search(region);
        match self.config.collapse {
            None => exons.into_iter().cloned().collect(),
            Some(Collapse::Gene) => self.collapse_genes(&exons),
            Some(Collapse::Transcript) => self.collapse_transcripts(&exons),
        }
    }

    /// Exons by gene id, genes in order of first appearance
    ///
    /// Exons without a gene id are dropped.
    fn by_gene<'r>(&self, exons: &[&'r FeatureRecord]) -> Vec<(&'r str, Vec<&'r FeatureRecord>)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut genes: Vec<(&str, Vec<&FeatureRecord>)> = Vec::new();
        let mut dropped = 0;

        for &exon in exons {
            let Some(gene) = exon.attr(&self.config.gene_id) else {
                dropped += 1;
                continue;
            };
            let slot = *index.entry(gene).or_insert(genes.len());
            if slot == genes.len() {
                genes.push((gene, Vec::new()));
            }
            genes[slot].1.push(exon);
        }

        if dropped > 0 {
            debug!("Dropped {} exons without '{}'", dropped, self.config.gene_id);
        }
        genes
    }

    /// Record carrying the gene-level attributes of a gene's first exon
    fn gene_record(&self, gene: &str, first: &FeatureRecord, start: u64, end: u64) -> FeatureRecord {
        let mut record = FeatureRecord::new(first.chrom.clone(), start, end)
            .with_strand(first.strand)
            .with_attr(self.config.gene_id.clone(), gene);
        if let Some(hue) = self.config.hue.as_deref() {
            if let Some(value) = first.attr(hue) {
                record = record.with_attr(hue, value);
            }
        }
        record
    }

    fn collapse_genes(&self, exons: &[&FeatureRecord]) -> Vec<FeatureRecord> {
        self.by_gene(exons)
            .into_iter()
            .filter_map(|(gene, members)| {
                let first = *members.first()?;
                let start = members.iter().map(|r| r.start).min()?;
                let end = members.iter().map(|r| r.end).max()?;
                Some(self.gene_record(gene, first, start, end))
            })
            .collect()
    }

    fn collapse_transcripts(&self, exons: &[&FeatureRecord]) -> Vec<FeatureRecord> {
        let mut collapsed = Vec::new();
        for (gene, members) in self.by_gene(exons) {
            let Some(&first) = members.first() else {
                continue;
            };
            for (start, end) in merge_intervals(members.iter().map(|r| (r.start, r.end))) {
                collapsed.push(self.gene_record(gene, first, start, end));
            }
        }
        collapsed
    }

    /// Feature track over the (collapsed) exons of a region
    pub fn build_track(&self, region: &Region) -> FeatureTrack {
        FeatureTrack::with_color_map(
            FeatureSet::new(self.fetch_exons(region)),
            self.config.feature_config(),
            self.color_map.clone(),
        )
    }
}

impl Track for GeneTrack {
    fn layout(&self, region: &Region, ctx: &mut DrawContext<'_>) -> LayoutResult<TrackLayout> {
        self.build_track(region).layout(region, ctx)
    }
}
