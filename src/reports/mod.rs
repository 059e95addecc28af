use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use syllaforge::config::{TyperConfig, CONFIG_PATHS};
use syllaforge::ranking::{highlight, rarity_score};
use syllaforge::typist::{DelayKind, TypingStats};
use syllaforge::Suggestions;

pub fn print_suggestions(s: &Suggestions, limit: usize) {
    println!(
        "\n🔎 '{}' in {}: {} matches (by {}, {})",
        s.query,
        s.dictionary,
        s.len(),
        s.applied,
        s.direction
    );
    if s.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Word").add_attribute(Attribute::Bold),
        Cell::new("Freq").fg(Color::Cyan),
        Cell::new("Len"),
        Cell::new("Rarity").fg(Color::Magenta),
    ]);

    for i in [0, 2, 3, 4] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (rank, e) in s.top(limit).iter().enumerate() {
        let word = match highlight(&e.word, &s.query) {
            Some((before, hit, after)) => format!("{}[{}]{}", before, hit.to_uppercase(), after),
            None => e.word.clone(),
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(word),
            Cell::new(e.frequency).fg(Color::Cyan),
            Cell::new(e.len()),
            Cell::new(rarity_score(&e.word)).fg(Color::Magenta),
        ]);
    }
    println!("{}", table);

    if s.len() > limit {
        println!("   ... and {} more", s.len() - limit);
    }
}

pub fn print_config(cfg: &TyperConfig) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Setting").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
        Cell::new("Default"),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }
    if let Some(col) = table.column_mut(2) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for path in CONFIG_PATHS {
        let value = cfg.get(path).unwrap_or(f64::NAN);
        let default = TyperConfig::DEFAULT.get(path).unwrap_or(f64::NAN);
        let value_cell = Cell::new(value);
        let value_cell = if value != default {
            value_cell.fg(Color::Yellow)
        } else {
            value_cell
        };
        table.add_row(vec![Cell::new(path), value_cell, Cell::new(default)]);
    }
    println!("{}", table);
}

pub fn print_schedule(pauses: &[(DelayKind, f64)]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Step").add_attribute(Attribute::Bold),
        Cell::new("Pause").add_attribute(Attribute::Bold),
        Cell::new("ms"),
    ]);
    for (i, (kind, ms)) in pauses.iter().enumerate() {
        let kind_cell = match kind {
            DelayKind::InterKey => Cell::new(kind),
            _ => Cell::new(kind).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            kind_cell,
            Cell::new(format!("{:.1}", ms)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_typing_stats(word: &str, stats: &TypingStats) {
    let chars = word.chars().count().max(1);
    println!(
        "\n✅ Typed '{}': {} keystrokes, {} typos, {:.0}ms total ({:.0}ms/char)",
        word,
        stats.keystrokes,
        stats.typos,
        stats.total_delay_ms,
        stats.total_delay_ms / chars as f64
    );
}
