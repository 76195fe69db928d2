use roundcast_core::pipeline::PipelineStats;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  "));

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}

pub fn stats_rows(stats: &PipelineStats) -> Vec<Vec<String>> {
    [
        ("frames received", stats.frames_received),
        ("frames ignored", stats.frames_ignored),
        ("empty rosters ignored", stats.rosters_ignored),
        ("rosters rejected", stats.rosters_rejected),
        ("rounds enqueued", stats.rounds_enqueued),
        ("empty rounds discarded", stats.rounds_discarded),
        ("notifications extracted", stats.notifications_extracted),
        ("notifications dropped", stats.notifications_dropped),
        ("notifications dispatched", stats.notifications_dispatched),
        ("ticks", stats.ticks),
    ]
    .into_iter()
    .map(|(name, value)| vec![name.to_string(), value.to_string()])
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_rows_cover_every_counter() {
        let stats = PipelineStats {
            rosters_rejected: 2,
            ticks: 3,
            ..PipelineStats::default()
        };
        let rows = stats_rows(&stats);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[3], ["rosters rejected", "2"]);
        assert_eq!(rows[9], ["ticks", "3"]);
    }
}
