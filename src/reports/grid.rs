use cipherforge::alphabet::Alphabet;
use cipherforge::cipher::Mapping;
use cipherforge::ngram::BigramShares;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};

/// Source symbols over their images, one column per symbol.
pub fn print_mapping(name: &str, mapping: &Mapping, source: &Alphabet) {
    println!("\nMapping: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let top: Vec<Cell> = source
        .iter()
        .map(|s| Cell::new(s).set_alignment(CellAlignment::Center))
        .collect();
    let bottom: Vec<Cell> = source
        .iter()
        .map(|s| {
            let image = mapping.get(s).map(String::from).unwrap_or_else(|| "?".to_string());
            Cell::new(image).set_alignment(CellAlignment::Center)
        })
        .collect();

    table.add_row(top);
    table.add_row(bottom);
    println!("{}", table);
}

/// Leading letter per row, trailing letter per column; hotter cells take a
/// larger share of all bigrams.
pub fn print_shares(name: &str, shares: &BigramShares) {
    println!("\nBigram shares: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let max = shares.max_share();
    let mut header = vec![Cell::new("")];
    header.extend(
        shares
            .letters
            .iter()
            .map(|l| Cell::new(l).set_alignment(CellAlignment::Center)),
    );
    table.add_row(header);

    for (leading, row) in shares.letters.iter().zip(&shares.shares) {
        let mut cells = vec![Cell::new(leading)];
        cells.extend(row.iter().map(|&share| {
            let heat = if max > 0.0 { share / max } else { 0.0 };
            let color = if heat > 0.66 {
                Color::Red
            } else if heat > 0.33 {
                Color::Yellow
            } else {
                Color::Reset
            };
            Cell::new(format!("{:.1}", share * 100.0))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }));
        table.add_row(cells);
    }
    println!("{}", table);
}
