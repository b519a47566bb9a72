use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use core_types::MaxProfit;
use risk::RiskAnalyzer;
use simulator::SimulationEngine;
use std::path::PathBuf;
use strategies::{build_strategy, OptionsStrategy, StrategyParams};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// The main entry point for the optsim toolkit.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => handle_analyze(args),
        Commands::Simulate(args) => handle_simulate(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Static analysis and day-stepped simulation of multi-leg option strategies.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Statically analyze strategies from a parameter file.
    Analyze(AnalyzeArgs),
    /// Run the portfolio simulation over the configured number of days.
    Simulate(SimulateArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// JSON file with the strategy parameters to analyze.
    #[arg(long, default_value = "strategies.json")]
    strategies: PathBuf,

    /// Analysis date (format: YYYY-MM-DD); defaults to the configured
    /// simulation start date.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Configuration file name.
    #[arg(long, default_value = "config")]
    config: String,
}

#[derive(Parser)]
struct SimulateArgs {
    /// JSON file with the strategy parameters to trade.
    #[arg(long, default_value = "strategies.json")]
    strategies: PathBuf,

    /// Configuration file name.
    #[arg(long, default_value = "config")]
    config: String,

    /// Override the configured price-process seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured number of simulated days.
    #[arg(long)]
    days: Option<u32>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load_strategies(path: &PathBuf, entry_date: NaiveDate) -> anyhow::Result<Vec<OptionsStrategy>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read strategy file {}", path.display()))?;
    let params: Vec<StrategyParams> =
        serde_json::from_str(&raw).context("Failed to parse strategy parameters")?;

    params
        .iter()
        .map(|p| build_strategy(p, entry_date).map_err(Into::into))
        .collect()
}

fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config(&args.config)?;
    let as_of = args.as_of.unwrap_or(config.simulation.start_date);
    let strategies = load_strategies(&args.strategies, as_of)?;
    let analyzer = RiskAnalyzer::new();

    let mut table = Table::new();
    table.set_header(vec![
        "Symbol",
        "Strategy",
        "Max Profit",
        "Max Loss",
        "Break-evens",
        "R/R",
        "P(profit)",
        "EV",
        "Recommendation",
    ]);

    for strategy in &strategies {
        let analysis = analyzer.analyze(strategy, as_of)?;
        let break_evens = analysis
            .break_even_points
            .iter()
            .map(|p| p.round_dp(2).to_string())
            .collect::<Vec<_>>()
            .join(" / ");
        let max_profit = match analysis.max_profit {
            MaxProfit::Unlimited => "unlimited".to_string(),
            MaxProfit::Finite(value) => value.round_dp(2).to_string(),
        };
        let risk_reward = match analysis.risk_reward_ratio {
            None => "unbounded".to_string(),
            Some(ratio) => ratio.round_dp(2).to_string(),
        };

        table.add_row(vec![
            strategy.symbol().to_string(),
            strategy.kind().to_string(),
            max_profit,
            analysis.max_loss.round_dp(2).to_string(),
            break_evens,
            risk_reward,
            analysis.probability_of_profit.to_string(),
            analysis.expected_value.round_dp(2).to_string(),
            analysis.recommendation.to_string(),
        ]);
    }

    println!("{table}");

    let rankings = analyzer.compare_strategies(&strategies, as_of)?;
    if !rankings.is_empty() {
        println!("\nRanking by expected value:");
        for (rank, row) in rankings.iter().enumerate() {
            println!(
                "  {}. {} {} (EV {})",
                rank + 1,
                row.symbol,
                row.kind,
                row.expected_value.round_dp(2)
            );
        }
    }

    let conditions = analyzer.analyze_market_conditions(&strategies, as_of)?;
    println!(
        "\nMarket sentiment: {} ({} strategies, total EV {}, avg P(profit) {})",
        conditions.sentiment,
        conditions.strategy_count,
        conditions.total_expected_value.round_dp(2),
        conditions.average_probability_of_profit.round_dp(2),
    );

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let mut config = configuration::load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.price_process.seed = seed;
    }
    if let Some(days) = args.days {
        config.simulation.simulation_days = days;
    }

    let strategies = load_strategies(&args.strategies, config.simulation.start_date)?;

    let run_id = Uuid::new_v4();
    let mut engine = SimulationEngine::new(run_id, config)?;
    for strategy in strategies {
        engine.add_strategy(strategy);
    }

    let result = engine.run()?;

    let mut summary = Table::new();
    summary.set_header(vec!["Metric", "Value"]);
    summary.add_row(vec!["Run".to_string(), result.run_id.to_string()]);
    summary.add_row(vec![
        "Final value".to_string(),
        result.final_value.round_dp(2).to_string(),
    ]);
    summary.add_row(vec![
        "Total return %".to_string(),
        result.total_return_pct.round_dp(2).to_string(),
    ]);
    summary.add_row(vec![
        "Trades (win/loss)".to_string(),
        format!(
            "{} ({}/{})",
            result.total_trades, result.winning_trades, result.losing_trades
        ),
    ]);
    summary.add_row(vec![
        "Win rate %".to_string(),
        result.win_rate_pct.round_dp(2).to_string(),
    ]);
    summary.add_row(vec![
        "Max drawdown".to_string(),
        result.report.max_drawdown.round_dp(2).to_string(),
    ]);
    summary.add_row(vec![
        "Sharpe (daily)".to_string(),
        result
            .report
            .sharpe_ratio
            .map(|s| s.round_dp(3).to_string())
            .unwrap_or_else(|| "n/a".to_string()),
    ]);
    println!("{summary}");

    if !result.trades.is_empty() {
        let mut trades = Table::new();
        trades.set_header(vec![
            "#", "Symbol", "Strategy", "Entry", "Exit", "Qty", "P&L", "Reason",
        ]);
        for trade in &result.trades {
            trades.add_row(vec![
                trade.trade_id.to_string(),
                trade.symbol.clone(),
                trade.strategy.to_string(),
                trade.entry_date.to_string(),
                trade.exit_date.to_string(),
                trade.quantity.to_string(),
                trade.pnl.round_dp(2).to_string(),
                trade.exit_reason.to_string(),
            ]);
        }
        println!("{trades}");
    }

    Ok(())
}
