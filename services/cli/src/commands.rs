use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use home_score::config::ScoringConfig;
use home_score::error::AppError;
use home_score::scoring::{
    RuleCatalog, ScoredRecord, ScoringRule, WeightedScoringEngine, WeightedScoringService,
};
use serde_json::Value;

use crate::infra::{load_catalog, load_mapping, load_records};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file with the records to score (an array or a single object)
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Rule catalog JSON; defaults to HOME_SCORE_RULES or the built-in rules
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Rule key to record field mapping JSON; defaults to the home listing layout
    #[arg(long)]
    pub(crate) mapping: Option<PathBuf>,
    /// Pretty-print each result instead of one JSON object per line
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExplainArgs {
    /// Rule catalog JSON; defaults to HOME_SCORE_RULES or the built-in rules
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

pub(crate) fn run_score(
    args: ScoreArgs,
    config: &ScoringConfig,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let catalog = load_catalog(args.rules.as_deref(), config)?;
    let mapping = load_mapping(args.mapping.as_deref())?;
    let records = load_records(&args.records)?;

    let service = WeightedScoringService::new(catalog, mapping)
        .with_engine(WeightedScoringEngine::with_scale(config.normalized_scale));
    write_scored(&service, &records, args.pretty, out)
}

pub(crate) fn write_scored(
    service: &WeightedScoringService,
    records: &[Value],
    pretty: bool,
    out: &mut impl Write,
) -> Result<(), AppError> {
    for scored in service.score_records(records) {
        write_record(&scored, pretty, out)?;
    }
    Ok(())
}

fn write_record(scored: &ScoredRecord, pretty: bool, out: &mut impl Write) -> Result<(), AppError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, scored)?;
    } else {
        serde_json::to_writer(&mut *out, scored)?;
    }
    writeln!(out)?;
    Ok(())
}

pub(crate) fn run_defaults(out: &mut impl Write) -> Result<(), AppError> {
    let raw = RuleCatalog::home_search_defaults().to_json_pretty()?;
    writeln!(out, "{raw}")?;
    Ok(())
}

pub(crate) fn run_explain(
    args: ExplainArgs,
    config: &ScoringConfig,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let catalog = load_catalog(args.rules.as_deref(), config)?;
    write_explanation(&catalog, out)
}

pub(crate) fn write_explanation(
    catalog: &RuleCatalog,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let total: f64 = catalog.rules().iter().map(ScoringRule::max_possible).sum();
    writeln!(out, "{} rules, attainable maximum {:.1}", catalog.len(), total)?;

    let mut category = None;
    for rule in catalog.rules() {
        if category != Some(rule.category.as_str()) {
            writeln!(out, "\n{}", rule.category)?;
            category = Some(rule.category.as_str());
        }
        let flag = if rule.is_dealbreaker { " [dealbreaker]" } else { "" };
        writeln!(
            out,
            "  - {} ({}, weight {}, max {:.1}){}",
            rule.key,
            rule.kind,
            rule.weight(),
            rule.max_possible(),
            flag
        )?;
        if let Some(description) = &rule.description {
            writeln!(out, "      {description}")?;
        }
        for band in &rule.bands {
            writeln!(out, "      {} -> {} points", band.range_label(), band.points)?;
        }
        for option in &rule.enums {
            if option.is_dealbreaker {
                writeln!(out, "      {} -> dealbreaker", option.option)?;
            } else {
                writeln!(out, "      {} -> {} points", option.option, option.points)?;
            }
        }
    }
    Ok(())
}
