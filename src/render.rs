use analytics::{
    AmountFormatter, Breakdowns, Insight, JournalAnalysis, PlainAmountFormatter, Severity,
    TradeStats,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use core_types::Trade;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Presentation settings for the terminal views.
pub struct Renderer {
    amounts: PlainAmountFormatter,
    date_format: String,
}

impl Renderer {
    pub fn new(currency: &str, date_format: &str) -> Self {
        Self {
            amounts: PlainAmountFormatter::with_currency(currency),
            date_format: date_format.to_string(),
        }
    }

    pub fn amounts(&self) -> &PlainAmountFormatter {
        &self.amounts
    }

    fn money(&self, amount: Decimal) -> Cell {
        let color = if amount >= Decimal::ZERO { Color::Green } else { Color::Red };
        Cell::new(self.amounts.format_amount(amount)).fg(color)
    }

    pub fn trades(&self, trades: &[Trade]) -> Table {
        let mut table = new_table(vec![
            "ID", "Date", "Time", "Side", "Asset", "Lots", "Entry", "Stop", "Target", "Result",
            "Reasons",
        ]);
        for trade in trades {
            let reasons: Vec<&str> = trade.reasons.iter().map(|r| r.label()).collect();
            table.add_row(vec![
                Cell::new(trade.id.as_str()),
                Cell::new(trade.date.format(&self.date_format)),
                Cell::new(trade.time.format("%H:%M")),
                Cell::new(trade.operation_type),
                Cell::new(&trade.asset),
                Cell::new(trade.lots),
                Cell::new(trade.entry_price),
                Cell::new(trade.stop_loss),
                Cell::new(trade.take_profit),
                self.money(trade.result),
                Cell::new(reasons.join(", ")),
            ]);
        }
        table
    }

    pub fn stats(&self, stats: &TradeStats) -> Table {
        let mut table = new_table(vec!["Metric", "Value"]);
        table.add_row(vec![Cell::new("Trades"), Cell::new(stats.total_trades)]);
        table.add_row(vec![
            Cell::new("Win rate"),
            Cell::new(format!("{}%", analytics::util::fixed(stats.win_rate_pct, 1))),
        ]);
        table.add_row(vec![
            Cell::new("Average win"),
            self.money(stats.average_win),
        ]);
        table.add_row(vec![Cell::new("Winning trades"), Cell::new(stats.wins)]);
        table.add_row(vec![
            Cell::new("Average loss"),
            self.money(-stats.average_loss),
        ]);
        table.add_row(vec![Cell::new("Losing trades"), Cell::new(stats.losses)]);
        table.add_row(vec![Cell::new("Profit factor"), Cell::new(stats.profit_factor)]);
        table.add_row(vec![Cell::new("Net result"), self.money(stats.total_profit)]);
        table
    }

    pub fn breakdowns(&self, breakdowns: &Breakdowns) -> Vec<(&'static str, Table)> {
        let mut assets = new_table(vec!["Asset", "Trades", "Result", "Share"]);
        for row in &breakdowns.by_asset {
            assets.add_row(vec![
                Cell::new(&row.asset),
                Cell::new(row.count),
                self.money(row.total),
                Cell::new(bar(row.share_pct)),
            ]);
        }

        let mut reasons = new_table(vec!["Reason", "Trades", "Win rate", "Result"]);
        for row in &breakdowns.by_reason {
            let rate_color = if row.win_rate_pct >= Decimal::from(50) {
                Color::Green
            } else {
                Color::Red
            };
            reasons.add_row(vec![
                Cell::new(&row.label),
                Cell::new(row.count),
                Cell::new(format!("{}%", analytics::util::fixed(row.win_rate_pct, 1))).fg(rate_color),
                self.money(row.total),
            ]);
        }

        let mut periods = new_table(vec!["Period", "Hours", "Trades", "Win rate", ""]);
        for row in &breakdowns.by_time_of_day.periods {
            let hours = row.period.hours();
            periods.add_row(vec![
                Cell::new(row.period.label()),
                Cell::new(format!("{:02}:00-{:02}:59", hours.start, hours.end - 1)),
                Cell::new(row.count),
                Cell::new(format!("{}%", row.win_rate_display())),
                Cell::new(if row.is_best { "best" } else { "" }).fg(Color::Green),
            ]);
        }

        vec![
            ("Performance by asset", assets),
            ("Performance by entry reason", reasons),
            ("Performance by time of day", periods),
        ]
    }

    pub fn insights(&self, insights: &[Insight]) -> Table {
        let mut table = new_table(vec!["", "Insight", ""]);
        for insight in insights {
            let (marker, color) = match insight.severity {
                Severity::Positive => ("+", Color::Green),
                Severity::Warning => ("!", Color::Yellow),
                Severity::Neutral => ("i", Color::Blue),
            };
            table.add_row(vec![
                Cell::new(marker).fg(color),
                Cell::new(&insight.title).fg(color),
                Cell::new(&insight.text),
            ]);
        }
        table
    }

    pub fn print_analysis(&self, analysis: &JournalAnalysis) {
        println!("Summary\n{}", self.stats(&analysis.stats));
        for (title, table) in self.breakdowns(&analysis.breakdowns) {
            println!("\n{title}\n{table}");
        }
        println!("\nInsights\n{}", self.insights(&analysis.insights));
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Twenty-cell bar proportional to `share_pct`.
fn bar(share_pct: Decimal) -> String {
    let cells = analytics::util::round_half_up(share_pct / Decimal::from(5), 0);
    let cells = cells.to_usize().unwrap_or(0).min(20);
    "█".repeat(cells)
}
