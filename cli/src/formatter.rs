use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use grossup::{PayrollBreakdown, Probe, SearchOutcome};
use rust_decimal::Decimal;

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_outcome(&self, outcome: &SearchOutcome, raw: bool) -> String {
        if raw {
            return format!("{}\n", money(outcome.gross_salary()));
        }

        let mut output = self.two_column_table(&[
            ("Target net salary", money(outcome.request.target_net_salary)),
            (
                "Starting gross salary",
                money(outcome.request.starting_gross_salary),
            ),
            ("Gross salary", money(outcome.gross_salary())),
            ("Net salary", money(outcome.net_salary())),
            ("Overshoot", money(outcome.overshoot)),
            ("Iterations", outcome.iterations.to_string()),
        ]);
        output.push('\n');

        if !outcome.trace.is_empty() {
            output.push_str(&self.format_trace(&outcome.trace));
            output.push('\n');
        }

        output
    }

    pub fn format_trace(&self, probes: &[Probe]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("#").set_alignment(CellAlignment::Right),
            Cell::new("Step").set_alignment(CellAlignment::Right),
            Cell::new("Gross").set_alignment(CellAlignment::Right),
            Cell::new("Net").set_alignment(CellAlignment::Right),
        ]));

        for probe in probes {
            let step = probe.step.map(money).unwrap_or_else(|| "-".to_string());
            table.add_row(Row::from(vec![
                Cell::new(probe.iteration).set_alignment(CellAlignment::Right),
                Cell::new(step).set_alignment(CellAlignment::Right),
                Cell::new(money(probe.state.gross_salary())).set_alignment(CellAlignment::Right),
                Cell::new(money(probe.state.net_salary())).set_alignment(CellAlignment::Right),
            ]));
        }

        table.to_string()
    }

    pub fn format_breakdown(&self, breakdown: &PayrollBreakdown, raw: bool) -> String {
        if raw {
            return format!("{}\n", money(breakdown.net_salary));
        }

        let mut output = self.two_column_table(&[
            ("Gross salary", money(breakdown.gross_salary)),
            ("Contribution", money(breakdown.contribution)),
            ("Taxable income", money(breakdown.taxable_income)),
            ("Income tax", money(breakdown.income_tax)),
            ("Net salary", money(breakdown.net_salary)),
        ]);
        output.push('\n');
        output
    }

    /// One line per state seen while following a live search
    pub fn format_probe_line(&self, probe: &Probe) -> String {
        format!(
            "#{:<6} gross {:>12}  net {:>12}\n",
            probe.iteration,
            money(probe.state.gross_salary()),
            money(probe.state.net_salary())
        )
    }

    fn two_column_table(&self, rows: &[(&str, String)]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        for (label, value) in rows {
            table.add_row(Row::from(vec![
                Cell::new(label).set_alignment(CellAlignment::Left),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]));
        }
        table.to_string()
    }
}
