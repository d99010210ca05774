use cipherforge::ngram::classify::{ClassificationScore, Flag};
use cipherforge::reducer::ReducedLine;
use cipherforge::reduction::ReductionOutcome;
use cipherforge::search::SearchOutcome;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn ngrams(title: &str, ranked: &[(&str, f64)], total: f64, top: usize) {
    println!("\n{} (total {:.0})", title, total);
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#"),
        Cell::new("N-gram").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Share").fg(Color::Cyan),
    ]);

    for (rank, (key, count)) in ranked.iter().take(top).enumerate() {
        let share = if total > 0.0 { count / total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(key).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", count)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}%", share))
                .fg(Color::Cyan)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}

pub fn reduced(lines: &[ReducedLine]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Text").add_attribute(Attribute::Bold),
        Cell::new("Samples"),
    ]);
    for line in lines {
        table.add_row(vec![Cell::new(&line.text), Cell::new(line.sources.join(", "))]);
    }
    println!("{}", table);
}

pub fn classification(rows: &[(String, String, ClassificationScore)]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Sample").add_attribute(Attribute::Bold),
        Cell::new("Text"),
        Cell::new("Log ratio"),
        Cell::new("Strength"),
        Cell::new("Flag"),
    ]);
    for i in 2..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (source, text, score) in rows {
        let color = match score.flag {
            Flag::Rejected => Color::Red,
            Flag::Exemplar => Color::Green,
            Flag::Neutral => Color::Reset,
        };
        table.add_row(vec![
            Cell::new(source).add_attribute(Attribute::Bold),
            Cell::new(text),
            Cell::new(format!("{:.3}", score.log_ratio)),
            Cell::new(format!("{:.1}x", score.strength)),
            Cell::new(score.flag).fg(color),
        ]);
    }
    println!("{}", table);
}

pub fn outcome(outcome: &SearchOutcome, decoded: &[(String, String)]) {
    println!(
        "\nStrategy: {} | Score: {:.3} | Iterations: {}",
        outcome.strategy, outcome.score, outcome.iterations
    );
    println!("Mapping: {}", outcome.mapping);

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Sample").add_attribute(Attribute::Bold),
        Cell::new("Decoded").fg(Color::Cyan),
    ]);
    for (source, text) in decoded {
        table.add_row(vec![Cell::new(source), Cell::new(text).fg(Color::Cyan)]);
    }
    println!("{}", table);
}

pub fn partition(outcome: &ReductionOutcome) {
    println!(
        "\nBest of {} partitions (error {:.4})",
        outcome.evaluated, outcome.error
    );
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Class").add_attribute(Attribute::Bold),
        Cell::new("Source symbols"),
    ]);
    for class in &outcome.classes {
        table.add_row(vec![
            Cell::new(class.label).add_attribute(Attribute::Bold),
            Cell::new(class.members.iter().collect::<String>()),
        ]);
    }
    println!("{}", table);
}
