//! CSV rendering of battle results.
//!
//! One row per ship plus one `fleet` row per player carrying the win chance, so a
//! spreadsheet can pivot on `scenario`/`player` without extra parsing.

use std::io::Write;

use serde::Serialize;

use crate::combat::engine::BattleResult;
use crate::combat::fleet::Side;

#[derive(Debug, Clone, Serialize)]
struct CsvRow<'a> {
    scenario: &'a str,
    player: u8,
    row: &'static str,
    ship: Option<usize>,
    probability: f64,
}

fn rows<'a>(scenario: &'a str, result: &BattleResult) -> Vec<CsvRow<'a>> {
    let mut out = Vec::new();
    for side in [Side::Player1, Side::Player2] {
        out.push(CsvRow {
            scenario,
            player: side.number(),
            row: "fleet",
            ship: None,
            probability: result.win_chance(side),
        });
        out.extend(
            result
                .ship_survival(side)
                .iter()
                .enumerate()
                .map(|(index, survival)| CsvRow {
                    scenario,
                    player: side.number(),
                    row: "ship",
                    ship: Some(index + 1),
                    probability: *survival,
                }),
        );
    }
    out
}

/// Write `(scenario name, result)` pairs as one CSV table with a header row.
pub fn write_results_csv<W: Write>(
    writer: W,
    results: &[(String, BattleResult)],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (scenario, result) in results {
        for row in rows(scenario, result) {
            csv_writer.serialize(row)?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn results_to_csv_string(results: &[(String, BattleResult)]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_results_csv(&mut buffer, results)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
