// In app/src/report.rs

use chrono::{DateTime, Utc};
use core_types::{AssetAnalysis, Balance};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    total_value_usd: f64,
    assets: &'a [AssetAnalysis],
}

/// Sum of every holding whose balance is known.
pub fn total_value_usd(analyses: &[AssetAnalysis]) -> f64 {
    analyses.iter().filter_map(AssetAnalysis::holding_value_usd).sum()
}

pub fn render_json(analyses: &[AssetAnalysis], generated_at: DateTime<Utc>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        generated_at,
        total_value_usd: total_value_usd(analyses),
        assets: analyses,
    })
}

/// A fixed-width table, one row per asset followed by its indicator verdicts.
pub fn render_table(analyses: &[AssetAnalysis]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:<24} {:>14} {:>8} {:>16} {:>14}  {}\n",
        "SYMBOL", "ASSET", "PRICE (USD)", "24H %", "BALANCE", "VALUE (USD)", "ACTION"
    ));

    for analysis in analyses {
        let change = analysis
            .price_change_24h_pct
            .map(|pct| format!("{:+.2}", pct))
            .unwrap_or_else(|| "-".to_string());
        let balance = match analysis.balance {
            Balance::Known(amount) => format!("{:.6}", amount),
            Balance::Unknown => "unknown".to_string(),
        };
        let value = analysis
            .holding_value_usd()
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!(
            "{:<8} {:<24} {:>14} {:>8} {:>16} {:>14}  {}\n",
            analysis.asset.symbol,
            truncate(&analysis.asset.display_name, 24),
            format_price(analysis.current_price_usd),
            change,
            balance,
            value,
            analysis.final_action
        ));
        for signal in &analysis.algorithm_signals {
            out.push_str(&format!("         - {:<16} {:<4} {}\n", signal.algorithm, signal.action.as_str(), signal.reason));
        }
    }

    out.push_str(&format!("\nTotal value: ${:.2}\n", total_value_usd(analyses)));
    out
}

fn format_price(price: f64) -> String {
    if price == 0.0 {
        "-".to_string()
    } else if price < 1.0 {
        format!("{:.6}", price)
    } else {
        format!("{:.2}", price)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max - 1).collect();
    short.push('~');
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{AlgorithmSignal, Asset, Chain, TradeAction};

    fn analysis(chain: Chain, price: f64, balance: Balance) -> AssetAnalysis {
        AssetAnalysis {
            asset: Asset::default_for(chain),
            current_price_usd: price,
            price_change_24h_pct: Some(-1.25),
            balance,
            history: Vec::new(),
            algorithm_signals: vec![AlgorithmSignal::new("RSI", TradeAction::Buy, "RSI 25.0 is oversold")],
            final_action: TradeAction::Hold,
        }
    }

    #[test]
    fn unknown_balances_do_not_count_towards_the_total() {
        let analyses = vec![
            analysis(Chain::Bitcoin, 60_000.0, Balance::Known(0.5)),
            analysis(Chain::Solana, 150.0, Balance::Unknown),
        ];
        assert_eq!(total_value_usd(&analyses), 30_000.0);
    }

    #[test]
    fn table_lists_assets_and_their_signals() {
        let table = render_table(&[analysis(Chain::Bitcoin, 60_000.0, Balance::Known(0.5))]);
        assert!(table.contains("BTC"));
        assert!(table.contains("60000.00"));
        assert!(table.contains("-1.25"));
        assert!(table.contains("RSI 25.0 is oversold"));
        assert!(table.contains("Total value: $30000.00"));
    }

    #[test]
    fn json_report_carries_the_total() {
        let json = render_json(&[analysis(Chain::Bitcoin, 60_000.0, Balance::Known(0.5))], Utc::now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalValueUsd"], 30_000.0);
        assert_eq!(value["assets"].as_array().unwrap().len(), 1);
    }
}
